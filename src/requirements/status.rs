//! Package identity and install attempt bookkeeping.
//!
//! Every strategy the install chain tries leaves an [`InstallAttempt`] in
//! the ordered [`AttemptLog`]. A successful chain yields an
//! [`Installation`]; an exhausted one renders the log into its diagnostic.

use std::fmt;

use crate::runtime::RuntimeHandle;
use crate::shell::CommandSpec;

/// The package the service lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Distribution name given to installers, e.g. `visidata-mcp`.
    pub name: String,
    /// Top-level import name, e.g. `visidata_mcp`.
    pub import_name: String,
    /// Module run with `-m` to start the service, e.g. `visidata_mcp.server`.
    pub module: String,
}

impl PackageSpec {
    pub fn new(
        name: impl Into<String>,
        import_name: impl Into<String>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            import_name: import_name.into(),
            module: module.into(),
        }
    }
}

/// Why a strategy did not produce an importable package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The install command ran and exited non-zero (or was killed).
    CommandFailed { code: Option<i32> },
    /// The install command could not be started.
    CouldNotStart { message: String },
    /// The install command exited 0 but the import probe still fails.
    PackageAbsentAfterInstall,
    /// A tool the strategy needs is not on PATH.
    ToolUnavailable { tool: String },
    /// The strategy does not apply on this host.
    NotApplicable { reason: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::CommandFailed { code: Some(code) } => {
                write!(f, "exited with code {}", code)
            }
            FailureReason::CommandFailed { code: None } => {
                write!(f, "terminated without an exit code")
            }
            FailureReason::CouldNotStart { message } => write!(f, "could not start: {}", message),
            FailureReason::PackageAbsentAfterInstall => {
                write!(f, "installer succeeded but the package still cannot be imported")
            }
            FailureReason::ToolUnavailable { tool } => write!(f, "{} not found on PATH", tool),
            FailureReason::NotApplicable { reason } => write!(f, "{}", reason),
        }
    }
}

/// Outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure(FailureReason),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// One strategy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallAttempt {
    /// Strategy name, e.g. `user` or `pipx (retry)`.
    pub strategy_name: String,
    /// The command the strategy ran (or would have run).
    pub command: CommandSpec,
    pub outcome: AttemptOutcome,
    /// Extra context, e.g. the tail of the installer's stderr.
    pub diagnostic: Option<String>,
}

/// Ordered record of every attempt made by one chain run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptLog {
    attempts: Vec<InstallAttempt>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a successful attempt.
    pub fn record_success(&mut self, strategy_name: &str, command: &CommandSpec) {
        self.push(strategy_name, command, AttemptOutcome::Success, None);
    }

    /// Append a failed attempt.
    pub fn record_failure(
        &mut self,
        strategy_name: &str,
        command: &CommandSpec,
        reason: FailureReason,
        diagnostic: Option<String>,
    ) {
        self.push(
            strategy_name,
            command,
            AttemptOutcome::Failure(reason),
            diagnostic,
        );
    }

    fn push(
        &mut self,
        strategy_name: &str,
        command: &CommandSpec,
        outcome: AttemptOutcome,
        diagnostic: Option<String>,
    ) {
        self.attempts.push(InstallAttempt {
            strategy_name: strategy_name.to_string(),
            command: command.clone(),
            outcome,
            diagnostic,
        });
    }

    /// Attempts in the order they were made.
    pub fn attempts(&self) -> &[InstallAttempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Strategy names in attempt order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .map(|a| a.strategy_name.as_str())
            .collect()
    }
}

/// A package that imports under `runtime`.
#[derive(Debug, Clone)]
pub struct Installation {
    /// Strategy that installed it; `None` when it was already present.
    pub strategy: Option<String>,
    /// Interpreter that imports the package. For pipx this is the
    /// interpreter inside the isolated environment.
    pub runtime: RuntimeHandle,
    /// Attempts made on the way.
    pub attempts: AttemptLog,
}

impl Installation {
    /// Whether the package was already importable before the chain ran.
    pub fn was_present(&self) -> bool {
        self.strategy.is_none()
    }
}
