//! `pyboot-setup check`: find a usable interpreter.

use crate::bootstrap::Bootstrap;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand<'a> {
    bootstrap: Bootstrap<'a>,
}

impl<'a> CheckCommand<'a> {
    /// Create a new check command.
    pub fn new(bootstrap: Bootstrap<'a>) -> Self {
        Self { bootstrap }
    }
}

impl Command for CheckCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let min_version = &self.bootstrap.config().runtime.min_version;
        ui.show_header(&format!("Looking for Python {}+", min_version));

        let runtime = self.bootstrap.locate_runtime()?;
        ui.success(&format!(
            "Found {} ({})",
            runtime.version_string, runtime.command
        ));

        Ok(CommandResult::success())
    }
}
