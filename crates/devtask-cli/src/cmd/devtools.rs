use super::Workspace;
use crate::output::{print_json, print_table};
use devtask_core::devtools::{ProvisionOutcome, Provisioner, ToolStatus};

pub fn run(ws: &Workspace, yes: bool) -> anyhow::Result<()> {
    let executor = ws.executor(None)?;
    let session = ws.session(&executor);
    let requirements = session.requirements();

    let statuses = Provisioner::new(session.executor, session.confirm).check(&requirements)?;
    if ws.json {
        print_json(&statuses)?;
    } else {
        print_statuses(&statuses);
    }

    match session.ensure_devtools(yes)? {
        ProvisionOutcome::AlreadySatisfied => {
            if !ws.json {
                println!("All devtools are installed.");
            }
        }
        ProvisionOutcome::Installed(names) => {
            if !ws.json {
                println!("Installed: {}", names.join(", "));
            }
        }
    }
    Ok(())
}

fn print_statuses(statuses: &[ToolStatus]) {
    let rows = statuses
        .iter()
        .map(|s| {
            let status = if s.satisfied { "ok" } else { "missing" };
            vec![s.name.clone(), s.expected.clone(), status.to_string()]
        })
        .collect();
    print_table(&["TOOL", "EXPECTED", "STATUS"], rows);
}
