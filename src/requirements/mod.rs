//! Making the service package importable.
//!
//! # Modules
//!
//! - [`probe`] - Import probes and staged verification
//! - [`status`] - Package identity, attempt log and installation result
//! - [`strategy`] - The individual install strategies
//! - [`chain`] - Ordered fallthrough across strategies
//! - [`remediation`] - Diagnostic for an exhausted chain
//! - [`uninstall`] - Best-effort removal

pub mod chain;
pub mod probe;
pub mod remediation;
pub mod status;
pub mod strategy;
pub mod uninstall;

pub use chain::{ChainOutcome, InstallChain};
pub use probe::{PackageProbe, VerificationReport, VerificationStage};
pub use status::{AttemptLog, AttemptOutcome, FailureReason, InstallAttempt, Installation, PackageSpec};
pub use strategy::{InstallContext, InstallStrategy, StrategyKind};
pub use uninstall::{uninstall, UninstallOutcome, UninstallReport};
