use tracing::info;

use crate::compose::StartOptions;
use crate::error::{DevtaskError, Result};
use crate::session::Session;

pub fn lint_command(session: &Session<'_>, fix: bool) -> String {
    let mut line = format!(
        "{} run ./... -c {}",
        session.config.linter_bin().display(),
        session.config.lint_config
    );
    if fix {
        line.push_str(" --fix");
    }
    line
}

pub fn lint(session: &Session<'_>, fix: bool, yes: bool) -> Result<()> {
    session.ensure_devtools(yes)?;
    session.executor.run(&lint_command(session, fix))?;
    Ok(())
}

/// Scaffold a sequential up/down SQL migration pair named `name`.
pub fn migrate(session: &Session<'_>, name: &str, yes: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DevtaskError::EmptyMigrationName);
    }
    session.ensure_devtools(yes)?;
    session.executor.run(&format!(
        "{} create -ext sql -dir {} -seq -digits 4 {name}",
        session.config.migrator_bin().display(),
        session.config.migrations_dir
    ))?;
    Ok(())
}

/// Start infrastructure in the background and run the service in the
/// foreground. The executor is expected to carry the development env file.
pub fn dev(session: &Session<'_>) -> Result<()> {
    session
        .compose
        .start(session.executor, session.config, StartOptions::background())?;
    info!(package = %session.config.main_package, "starting service");
    session
        .executor
        .run(&format!("go run {}", session.config.main_package))?;
    Ok(())
}
