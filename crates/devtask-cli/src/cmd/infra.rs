use super::Workspace;
use crate::output::print_json;
use anyhow::Context;
use devtask_core::compose::{self, Compose, StartOptions};

pub fn start(ws: &Workspace, background: bool, current: bool, loadtest: bool) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    let opts = StartOptions {
        background,
        current,
        loadtest,
    };
    Compose::detect()
        .start(&executor, &ws.config, opts)
        .context("failed to start infrastructure")?;
    Ok(())
}

pub fn stop(ws: &Workspace) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    Compose::detect()
        .stop(&executor)
        .context("failed to stop infrastructure")?;
    Ok(())
}

pub fn remove(ws: &Workspace) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    let removed = compose::remove(&executor).context("failed to remove infrastructure")?;
    if ws.json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else if removed > 0 {
        println!("Removed {removed} container(s).");
    } else {
        println!("No containers to remove.");
    }
    Ok(())
}

pub fn prune(ws: &Workspace) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    compose::prune(&executor).context("failed to prune infrastructure")?;
    Ok(())
}
