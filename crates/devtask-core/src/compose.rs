//! Docker Compose infrastructure lifecycle.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::runner::{CommandExecutor, ExternalCommand};

/// How to invoke Compose on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compose {
    program: String,
}

impl Compose {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Prefer the standalone `docker-compose` binary, fall back to the
    /// `docker compose` plugin.
    pub fn detect() -> Self {
        if which::which("docker-compose").is_ok() {
            return Self::new("docker-compose");
        }
        debug!("docker-compose not on PATH, using `docker compose`");
        Self::new("docker compose")
    }

    pub fn up_line(&self, containers: &[String], background: bool) -> String {
        let mut parts = vec![self.program.clone(), "up".to_string(), "--build".to_string()];
        if background {
            parts.push("-d".to_string());
        }
        parts.extend(containers.iter().cloned());
        parts.join(" ")
    }

    pub fn start(
        &self,
        executor: &dyn CommandExecutor,
        config: &Config,
        opts: StartOptions,
    ) -> Result<()> {
        let containers = containers(config, opts);
        info!(containers = ?containers, background = opts.background, "starting infrastructure");
        executor.run(&self.up_line(&containers, opts.background))?;
        Ok(())
    }

    pub fn stop(&self, executor: &dyn CommandExecutor) -> Result<()> {
        executor.run(&format!("{} stop", self.program))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    pub background: bool,
    /// Also start the service's own container.
    pub current: bool,
    /// Also start the load-testing containers.
    pub loadtest: bool,
}

impl StartOptions {
    pub fn background() -> Self {
        Self {
            background: true,
            ..Self::default()
        }
    }
}

pub fn containers(config: &Config, opts: StartOptions) -> Vec<String> {
    let mut containers = config.services.clone();
    if opts.current {
        containers.push(config.service.clone());
    }
    if opts.loadtest {
        containers.extend(config.loadtest_services.iter().cloned());
    }
    containers
}

/// Stop and delete every container on the host, then prune volumes.
/// Returns how many containers were removed.
pub fn remove(executor: &dyn CommandExecutor) -> Result<usize> {
    let listing = executor.execute(&ExternalCommand::probe("docker ps -a -q"))?;
    let ids: Vec<&str> = if listing.failed() {
        Vec::new()
    } else {
        listing
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    };

    if ids.is_empty() {
        info!("no containers to remove");
        return Ok(0);
    }

    let joined = ids.join(" ");
    executor.run(&format!("docker stop {joined}"))?;
    executor.run(&format!("docker rm {joined}"))?;
    executor.run("docker volume prune --force")?;
    Ok(ids.len())
}

/// [`remove`] plus a system-wide prune of images, networks and build cache.
pub fn prune(executor: &dyn CommandExecutor) -> Result<()> {
    remove(executor)?;
    executor.run("docker system prune --force -a")?;
    Ok(())
}
