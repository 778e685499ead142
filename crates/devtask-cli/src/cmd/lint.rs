use super::Workspace;
use anyhow::Context;
use devtask_core::tasks;

pub fn run(ws: &Workspace, fix: bool, yes: bool) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    tasks::lint(&ws.session(&executor), fix, yes).context("lint failed")?;
    Ok(())
}
