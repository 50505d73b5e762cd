//! `pyboot-setup` command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes
//! subcommands to their implementations. Every command works on a
//! [`Bootstrap`](crate::bootstrap::Bootstrap), so the launcher and the
//! setup commands share one locate/install path.

pub mod check;
pub mod dispatcher;
pub mod install;
pub mod uninstall;
pub mod verify;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
