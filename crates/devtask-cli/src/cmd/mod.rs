pub mod dev;
pub mod devtools;
pub mod infra;
pub mod lint;
pub mod migrate;

use anyhow::Context;
use devtask_core::compose::Compose;
use devtask_core::config::Config;
use devtask_core::confirm::StdinConfirm;
use devtask_core::env::load_env_file;
use devtask_core::runner::ShellExecutor;
use devtask_core::session::Session;
use std::path::{Path, PathBuf};

/// Resolved project root and configuration shared by every command.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    /// Stdout carries only the JSON report; tool output goes to stderr.
    pub json: bool,
}

impl Workspace {
    pub fn load(root: &Path, gopath: Option<PathBuf>, json: bool) -> anyhow::Result<Self> {
        let config = Config::load(root)
            .context("failed to load config")?
            .with_gopath(gopath)?;
        Ok(Self {
            root: root.to_path_buf(),
            config,
            json,
        })
    }

    /// A shell executor rooted at the project, optionally carrying the
    /// variables of a dotenv file relative to the root.
    pub fn executor(&self, env_file: Option<&str>) -> anyhow::Result<ShellExecutor> {
        let mut executor = ShellExecutor::new().in_dir(&self.root);
        if self.json {
            executor = executor.stdout_to_stderr();
        }
        let Some(name) = env_file else {
            return Ok(executor);
        };
        let pairs = load_env_file(&self.root.join(name))
            .with_context(|| format!("failed to load env file '{name}'"))?;
        Ok(executor.with_envs(pairs))
    }

    pub fn session<'a>(&'a self, executor: &'a ShellExecutor) -> Session<'a> {
        Session {
            root: &self.root,
            config: &self.config,
            executor,
            confirm: &StdinConfirm,
            compose: Compose::detect(),
        }
    }
}
