//! Ordered install strategy chain.
//!
//! [`InstallChain::ensure_installed`] makes the package importable or
//! explains, attempt by attempt, why it could not:
//!
//! 1. if the package already imports, nothing runs;
//! 2. otherwise strategies are tried strictly in order, and the first one
//!    that installs *and* verifies ends the chain;
//! 3. when all of them fail the result is `InstallExhausted`, carrying a
//!    report of every attempt and the manual remediations.

use crate::error::{PybootError, Result};
use crate::runtime::RuntimeHandle;
use crate::ui::UserInterface;

use super::remediation::exhausted_report;
use super::status::{AttemptLog, Installation, PackageSpec};
use super::strategy::{InstallContext, InstallStrategy, StrategyKind};

/// What one chain run produced.
#[derive(Debug)]
pub enum ChainOutcome {
    Installed(Installation),
    Exhausted(AttemptLog),
}

/// Strategies in the order they are tried.
pub struct InstallChain {
    strategies: Vec<Box<dyn InstallStrategy>>,
}

impl Default for InstallChain {
    fn default() -> Self {
        Self::from_kinds(&StrategyKind::ALL)
    }
}

impl InstallChain {
    pub fn new(strategies: Vec<Box<dyn InstallStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain from configured strategy names.
    pub fn from_kinds(kinds: &[StrategyKind]) -> Self {
        Self::new(kinds.iter().map(|kind| kind.build()).collect())
    }

    /// Strategy names in order.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Make `package` importable, or fail with `InstallExhausted`.
    pub fn ensure_installed(
        &self,
        ctx: &InstallContext<'_>,
        ui: &mut dyn UserInterface,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
    ) -> Result<Installation> {
        match self.run(ctx, ui, runtime, package) {
            ChainOutcome::Installed(installation) => Ok(installation),
            ChainOutcome::Exhausted(log) => Err(PybootError::InstallExhausted {
                package: package.name.clone(),
                report: exhausted_report(&log, package, ctx.platform),
            }),
        }
    }

    /// Like [`ensure_installed`](Self::ensure_installed), but hands back the
    /// attempt log on failure instead of a rendered report.
    pub fn run(
        &self,
        ctx: &InstallContext<'_>,
        ui: &mut dyn UserInterface,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
    ) -> ChainOutcome {
        let mut log = AttemptLog::new();

        if ctx.probe().is_installed(runtime, &package.import_name) {
            return ChainOutcome::Installed(Installation {
                strategy: None,
                runtime: runtime.clone(),
                attempts: log,
            });
        }

        ui.message(&format!("Installing {}...", package.name));

        for strategy in &self.strategies {
            if let Err(reason) = strategy.is_applicable(ctx) {
                tracing::info!("skipping {}: {}", strategy.name(), reason);
                continue;
            }

            ui.message(&format!("Trying {}...", strategy.describe()));
            let before = log.len();
            let result = strategy.attempt(ctx, runtime, package, &mut log);
            for attempt in &log.attempts()[before..] {
                ui.detail(&attempt.command.to_string());
            }

            match result {
                Ok(installed) => {
                    ui.success(&format!(
                        "Installed {} ({})",
                        package.name,
                        strategy.name()
                    ));
                    return ChainOutcome::Installed(Installation {
                        strategy: Some(strategy.name().to_string()),
                        runtime: installed,
                        attempts: log,
                    });
                }
                Err(reason) => {
                    ui.warning(&format!("{} failed: {}", strategy.name(), reason));
                }
            }
        }

        ChainOutcome::Exhausted(log)
    }
}
