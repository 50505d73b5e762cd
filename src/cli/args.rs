//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The launcher: every argument belongs to the service.
#[derive(Parser, Debug)]
#[command(
    name = "pyboot",
    about = "Start the MCP service, installing its Python package if needed",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct LauncherCli {
    /// Arguments forwarded verbatim to the service
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Lifecycle commands for the service's Python package.
#[derive(Parser, Debug)]
#[command(name = "pyboot-setup")]
#[command(author, version, about = "Check, install, verify and remove the service's Python package")]
#[command(propagate_version = true)]
pub struct SetupCli {
    #[command(subcommand)]
    pub command: SetupCommands,

    /// Path to configuration file
    #[arg(long, global = true, env = "PYBOOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show each command as it runs
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SetupCommands {
    /// Locate a Python interpreter meeting the version floor
    Check,

    /// Install the package if needed and print the client configuration
    Install,

    /// Remove the package (never fails)
    Uninstall,

    /// Check that the package imports and the service entrypoint loads
    Verify(VerifyArgs),
}

/// Arguments for the `verify` command.
#[derive(Args, Debug, Clone, Default)]
pub struct VerifyArgs {
    /// Print the verification report as JSON
    #[arg(long)]
    pub json: bool,
}
