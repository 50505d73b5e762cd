//! `pyboot-setup verify`: staged import checks.

use crate::bootstrap::Bootstrap;
use crate::cli::args::VerifyArgs;
use crate::error::{exit_code, PybootError, Result};
use crate::requirements::VerificationReport;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The verify command implementation.
pub struct VerifyCommand<'a> {
    bootstrap: Bootstrap<'a>,
    args: VerifyArgs,
}

impl<'a> VerifyCommand<'a> {
    /// Create a new verify command.
    pub fn new(bootstrap: Bootstrap<'a>, args: VerifyArgs) -> Self {
        Self { bootstrap, args }
    }

    /// Run every stage against the located runtime.
    pub fn report(&self) -> Result<VerificationReport> {
        let runtime = self.bootstrap.locate_runtime()?;
        let package = self.bootstrap.config().package_spec();
        Ok(self
            .bootstrap
            .install_context()
            .probe()
            .verify(&runtime, &package))
    }

    fn show(&self, ui: &mut dyn UserInterface, report: &VerificationReport) {
        ui.show_header(&format!("Verifying under {} ({})", report.runtime, report.version));
        for stage in &report.stages {
            if stage.passed {
                ui.success(&stage.name);
            } else {
                match &stage.detail {
                    Some(detail) => ui.error(&format!("{}: {}", stage.name, detail)),
                    None => ui.error(&stage.name),
                }
            }
        }
    }
}

impl Command for VerifyCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.report()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| PybootError::Other(e.into()))?;
            println!("{}", json);
        } else {
            self.show(ui, &report);
        }

        if report.all_passed() {
            Ok(CommandResult::success())
        } else {
            if !self.args.json {
                ui.show_hint("Run 'pyboot-setup install' to install the package.");
            }
            Ok(CommandResult::failure(exit_code::GENERAL))
        }
    }
}
