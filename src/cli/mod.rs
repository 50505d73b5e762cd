//! Command-line interfaces for pyboot.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions for `pyboot` and `pyboot-setup`
//! - [`commands`] - `pyboot-setup` command implementations

pub mod args;
pub mod commands;

pub use args::{LauncherCli, SetupCli, SetupCommands, VerifyArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
