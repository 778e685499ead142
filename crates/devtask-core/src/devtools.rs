//! Pinned developer tool checks and installation.
//!
//! A tool is satisfied when its version query prints the expected marker on
//! the designated stream. [`Provisioner::ensure`] checks every tool, asks
//! before installing anything, installs the missing ones once and verifies
//! again. Calling it when everything is already in place does nothing.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::confirm::Confirm;
use crate::error::{DevtaskError, Result};
use crate::runner::{CommandExecutor, CommandResult, ExternalCommand};

pub const INSTALL_PROMPT: &str = "Devtools not installed, install?";

/// Which output stream carries a tool's version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    fn pick(self, result: &CommandResult) -> &str {
        match self {
            OutputStream::Stdout => &result.stdout,
            OutputStream::Stderr => &result.stderr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequirement {
    pub name: String,
    pub version_query: String,
    pub marker: String,
    pub stream: OutputStream,
    pub installer: String,
}

/// The linter, test runner and migration tool pinned in `config`.
pub fn default_requirements(config: &Config) -> Vec<ToolRequirement> {
    let tools = &config.tools;
    vec![
        ToolRequirement {
            name: "gotestsum".to_string(),
            version_query: format!("{} --version", config.tester_bin().display()),
            marker: tools.tester.marker().to_string(),
            stream: OutputStream::Stdout,
            installer: format!("go install gotest.tools/gotestsum@v{}", tools.tester.version),
        },
        ToolRequirement {
            name: "golangci-lint".to_string(),
            version_query: format!("{} --version", config.linter_bin().display()),
            marker: tools.linter.marker().to_string(),
            stream: OutputStream::Stdout,
            installer: format!(
                "curl -sSfL https://raw.githubusercontent.com/golangci/golangci-lint/master/install.sh \
                 | sudo sh -s -- -b {} v{}",
                config.gopath_bin().display(),
                tools.linter.version
            ),
        },
        ToolRequirement {
            name: "migrate".to_string(),
            // migrate prints its version on stderr
            version_query: format!("{} --version", config.migrator_bin().display()),
            marker: tools.migrator.marker().to_string(),
            stream: OutputStream::Stderr,
            installer: format!(
                "go install -tags 'postgres' github.com/golang-migrate/migrate/v4/cmd/migrate@v{}",
                tools.migrator.version
            ),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub expected: String,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    AlreadySatisfied,
    /// Names of the tools whose installers ran.
    Installed(Vec<String>),
}

pub struct Provisioner<'a> {
    executor: &'a dyn CommandExecutor,
    confirm: &'a dyn Confirm,
}

impl<'a> Provisioner<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, confirm: &'a dyn Confirm) -> Self {
        Self { executor, confirm }
    }

    /// Query every tool's version without installing anything.
    pub fn check(&self, requirements: &[ToolRequirement]) -> Result<Vec<ToolStatus>> {
        requirements
            .iter()
            .map(|req| {
                let result = self
                    .executor
                    .execute(&ExternalCommand::probe(&req.version_query))?;
                Ok(ToolStatus {
                    name: req.name.clone(),
                    expected: req.marker.clone(),
                    satisfied: req.stream.pick(&result).contains(&req.marker),
                })
            })
            .collect()
    }

    pub fn ensure(
        &self,
        requirements: &[ToolRequirement],
        auto_confirm: bool,
    ) -> Result<ProvisionOutcome> {
        let missing = self.missing(requirements)?;
        if missing.is_empty() {
            return Ok(ProvisionOutcome::AlreadySatisfied);
        }

        info!(tools = ?missing.iter().map(|r| &r.name).collect::<Vec<_>>(), "devtools missing");
        if !auto_confirm && !self.confirm.confirm(INSTALL_PROMPT)? {
            return Err(DevtaskError::InstallDeclined);
        }

        for req in &missing {
            info!(tool = %req.name, "installing");
            self.executor.run(&req.installer)?;
        }
        let installed = missing.iter().map(|r| r.name.clone()).collect();

        let still_missing = self.missing(requirements)?;
        if !still_missing.is_empty() {
            let names: Vec<String> = still_missing.into_iter().map(|r| r.name.clone()).collect();
            warn!(tools = ?names, "devtools still missing after install");
            return Err(DevtaskError::InstallVerificationFailed(names));
        }
        Ok(ProvisionOutcome::Installed(installed))
    }

    fn missing<'r>(&self, requirements: &'r [ToolRequirement]) -> Result<Vec<&'r ToolRequirement>> {
        let statuses = self.check(requirements)?;
        Ok(requirements
            .iter()
            .zip(statuses)
            .filter(|(_, status)| !status.satisfied)
            .map(|(req, _)| req)
            .collect())
    }
}
