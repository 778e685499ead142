use super::Workspace;
use anyhow::Context;
use devtask_core::tasks;

pub fn run(ws: &Workspace) -> anyhow::Result<()> {
    let executor = ws.executor(Some(ws.config.env.development.as_str()))?;
    tasks::dev(&ws.session(&executor)).context("development run failed")?;
    Ok(())
}
