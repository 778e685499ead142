use super::Workspace;
use anyhow::Context;
use devtask_core::tasks;

pub fn run(ws: &Workspace, name: &str, yes: bool) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    tasks::migrate(&ws.session(&executor), name, yes)
        .with_context(|| format!("failed to create migration '{}'", name.trim()))?;
    Ok(())
}
