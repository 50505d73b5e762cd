//! `pyboot-setup uninstall`: best-effort removal.
//!
//! Always succeeds. Failures are shown as warnings and logged.

use crate::bootstrap::Bootstrap;
use crate::error::Result;
use crate::requirements::{uninstall, UninstallOutcome, UninstallReport};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The uninstall command implementation.
pub struct UninstallCommand<'a> {
    bootstrap: Bootstrap<'a>,
}

impl<'a> UninstallCommand<'a> {
    /// Create a new uninstall command.
    pub fn new(bootstrap: Bootstrap<'a>) -> Self {
        Self { bootstrap }
    }

    /// Remove the package wherever it is found.
    pub fn run(&self, ui: &mut dyn UserInterface) -> UninstallReport {
        let runtime = match self.bootstrap.locate_runtime() {
            Ok(runtime) => Some(runtime),
            Err(e) => {
                tracing::info!("{}", e);
                None
            }
        };

        uninstall(
            &self.bootstrap.install_context(),
            ui,
            runtime.as_ref(),
            &self.bootstrap.config().package_spec(),
        )
    }
}

impl Command for UninstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.run(ui);
        let package = &self.bootstrap.config().package.name;

        for (route, outcome) in [("pip", Some(&report.pip)), ("pipx", report.pipx.as_ref())] {
            if let Some(UninstallOutcome::RemovalFailed { code }) = outcome {
                let code = code.map_or_else(|| "no exit code".to_string(), |c| format!("exit code {}", c));
                ui.warning(&format!("{} could not remove {} ({})", route, package, code));
            }
        }

        if report.removed_any() {
            ui.success(&format!("Removed {}", package));
        } else {
            ui.message(&format!("{} is not installed", package));
        }

        Ok(CommandResult::success())
    }
}
