//! Error types for pyboot operations.
//!
//! This module defines [`PybootError`], the primary error type used throughout
//! the crate, a [`Result`] type alias, and the process exit codes each
//! fatal condition maps to.
//!
//! # Error Handling Strategy
//!
//! - Use `PybootError` for conditions that end the bootstrap with a distinct exit code
//! - Use `anyhow::Error` (via `PybootError::Other`) for unexpected errors
//! - Per-strategy install failures are not errors; see
//!   [`FailureReason`](crate::requirements::status::FailureReason)

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes for fatal conditions.
///
/// A child that runs and exits on its own propagates its own code instead.
pub mod exit_code {
    /// Any error without a dedicated code.
    pub const GENERAL: i32 = 1;
    /// Configuration could not be loaded or failed validation.
    pub const CONFIG_INVALID: i32 = 2;
    /// No interpreter candidate met the version floor.
    pub const RUNTIME_NOT_FOUND: i32 = 10;
    /// Every install strategy failed.
    pub const INSTALL_FAILED: i32 = 11;
    /// The service process could not be created.
    pub const SPAWN_FAILED: i32 = 12;
}

/// Core error type for pyboot operations.
#[derive(Debug, Error)]
pub enum PybootError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// No candidate interpreter satisfies the version floor.
    #[error("{}", runtime_not_found_message(.floor, .best_seen.as_deref()))]
    RuntimeNotFound {
        /// Required floor, e.g. "3.10".
        floor: String,
        /// Highest version reported by any candidate, if any ran at all.
        best_seen: Option<String>,
        /// Platform-specific install suggestions.
        hint: String,
    },

    /// Every install strategy was attempted and failed.
    ///
    /// `report` lists each attempt and the manual remediations.
    #[error("Failed to install {package}")]
    InstallExhausted { package: String, report: String },

    /// The supervised service could not be started.
    #[error("Failed to start {command}: {message}")]
    SpawnFailed { command: String, message: String },

    /// External command failed or could not be started.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn runtime_not_found_message(floor: &str, best_seen: Option<&str>) -> String {
    match best_seen {
        Some(found) => format!("Found Python ({}) but version {}+ is required", found, floor),
        None => format!("Python {}+ is required but not found", floor),
    }
}

impl PybootError {
    /// Exit code the process should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            PybootError::RuntimeNotFound { .. } => exit_code::RUNTIME_NOT_FOUND,
            PybootError::InstallExhausted { .. } => exit_code::INSTALL_FAILED,
            PybootError::SpawnFailed { .. } => exit_code::SPAWN_FAILED,
            PybootError::ConfigNotFound { .. }
            | PybootError::ConfigParseError { .. }
            | PybootError::ConfigValidationError { .. } => exit_code::CONFIG_INVALID,
            PybootError::CommandFailed { .. } | PybootError::Io(_) | PybootError::Other(_) => {
                exit_code::GENERAL
            }
        }
    }

    /// Remediation text shown after the error line, if any.
    pub fn remediation(&self) -> Option<&str> {
        match self {
            PybootError::RuntimeNotFound { hint, .. } => Some(hint),
            PybootError::InstallExhausted { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Result type alias for pyboot operations.
pub type Result<T> = std::result::Result<T, PybootError>;
