use std::path::Path;

use crate::compose::Compose;
use crate::config::Config;
use crate::confirm::Confirm;
use crate::devtools::{default_requirements, ProvisionOutcome, Provisioner, ToolRequirement};
use crate::error::Result;
use crate::runner::CommandExecutor;

/// Everything a task needs: where it runs, what is configured, and the
/// capabilities it uses to reach the outside world.
pub struct Session<'a> {
    pub root: &'a Path,
    pub config: &'a Config,
    pub executor: &'a dyn CommandExecutor,
    pub confirm: &'a dyn Confirm,
    pub compose: Compose,
}

impl<'a> Session<'a> {
    pub fn requirements(&self) -> Vec<ToolRequirement> {
        default_requirements(self.config)
    }

    /// Make sure the pinned devtools are installed. `yes` skips the prompt.
    pub fn ensure_devtools(&self, yes: bool) -> Result<ProvisionOutcome> {
        Provisioner::new(self.executor, self.confirm).ensure(&self.requirements(), yes)
    }
}
