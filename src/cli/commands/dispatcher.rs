//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing `pyboot-setup` subcommands

use crate::bootstrap::Bootstrap;
use crate::cli::args::{SetupCli, SetupCommands};
use crate::config::LauncherConfig;
use crate::error::Result;
use crate::shell::SystemRunner;
use crate::ui::UserInterface;

use super::check::CheckCommand;
use super::install::InstallCommand;
use super::uninstall::UninstallCommand;
use super::verify::VerifyCommand;

/// Trait for command implementations.
///
/// Each subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// Fatal conditions are returned as errors and mapped to their exit
    /// code by the caller.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches setup commands to their implementations.
pub struct CommandDispatcher {
    config: LauncherConfig,
}

impl CommandDispatcher {
    /// Create a new dispatcher for a loaded configuration.
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Dispatch and execute a command against the real system.
    pub fn dispatch(&self, cli: &SetupCli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = SystemRunner;
        self.dispatch_with(Bootstrap::new(&self.config, &runner), &cli.command, ui)
    }

    /// Dispatch with the given bootstrap stages.
    pub fn dispatch_with(
        &self,
        bootstrap: Bootstrap<'_>,
        command: &SetupCommands,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        tracing::debug!("dispatching {:?}", command);
        match command {
            SetupCommands::Check => CheckCommand::new(bootstrap).execute(ui),
            SetupCommands::Install => InstallCommand::new(bootstrap).execute(ui),
            SetupCommands::Uninstall => UninstallCommand::new(bootstrap).execute(ui),
            SetupCommands::Verify(args) => VerifyCommand::new(bootstrap, args.clone()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::VerifyArgs;
    use crate::error::exit_code;
    use crate::shell::{MockResponse, MockRunner, Platform};
    use crate::ui::MockUI;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn check_without_runtime_is_an_error() {
        let dispatcher = CommandDispatcher::new(LauncherConfig::default());
        let runner = MockRunner::new();
        let bootstrap = Bootstrap::new(dispatcher.config(), &runner).with_platform(Platform::Linux);
        let mut ui = MockUI::new();

        let err = dispatcher
            .dispatch_with(bootstrap, &SetupCommands::Check, &mut ui)
            .unwrap_err();

        assert_eq!(err.exit_code(), exit_code::RUNTIME_NOT_FOUND);
    }

    #[test]
    fn uninstall_without_runtime_succeeds() {
        let dispatcher = CommandDispatcher::new(LauncherConfig::default());
        let runner = MockRunner::new();
        let bootstrap = Bootstrap::new(dispatcher.config(), &runner).with_platform(Platform::Linux);
        let mut ui = MockUI::new();

        let result = dispatcher
            .dispatch_with(bootstrap, &SetupCommands::Uninstall, &mut ui)
            .unwrap();

        assert_eq!(result, CommandResult::success());
    }

    #[test]
    fn verify_routes_to_verify_command() {
        let dispatcher = CommandDispatcher::new(LauncherConfig::default());
        let runner = MockRunner::new();
        runner.on("python3 --version", MockResponse::stdout("Python 3.12.1"));
        runner.on("python3 -c \"import visidata_mcp\"", MockResponse::exit(1));
        let bootstrap = Bootstrap::new(dispatcher.config(), &runner).with_platform(Platform::Linux);
        let mut ui = MockUI::new();

        let result = dispatcher
            .dispatch_with(
                bootstrap,
                &SetupCommands::Verify(VerifyArgs::default()),
                &mut ui,
            )
            .unwrap();

        assert_eq!(result, CommandResult::failure(exit_code::GENERAL));
    }
}
