//! Install strategies.
//!
//! Each strategy is one way of making the package importable. A strategy
//! runs its install command, and only if that exits 0 does it check that
//! the package now imports; a zero exit alone never counts as success.
//! Every command run is recorded in the [`AttemptLog`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::runtime::{RuntimeHandle, RuntimeLocator};
use crate::shell::{CommandOptions, CommandRunner, CommandSpec, OutputRouting, Platform};

use super::probe::PackageProbe;
use super::status::{AttemptLog, FailureReason, PackageSpec};

/// Result of one strategy: the runtime that now imports the package.
pub type StrategyResult = std::result::Result<RuntimeHandle, FailureReason>;

/// Everything a strategy needs from its surroundings.
pub struct InstallContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub platform: Platform,
    /// Bound for version and import probes. Installers are unbounded.
    pub probe_timeout: Duration,
    /// Where installer stdout goes.
    pub installer_stdout: OutputRouting,
}

impl<'a> InstallContext<'a> {
    pub fn new(runner: &'a dyn CommandRunner, platform: Platform, probe_timeout: Duration) -> Self {
        Self {
            runner,
            platform,
            probe_timeout,
            installer_stdout: OutputRouting::Inherit,
        }
    }

    /// Send installer stdout somewhere other than our stdout.
    pub fn with_installer_stdout(mut self, routing: OutputRouting) -> Self {
        self.installer_stdout = routing;
        self
    }

    pub fn probe(&self) -> PackageProbe<'a> {
        PackageProbe::new(self.runner, self.probe_timeout)
    }

    pub fn locator(&self) -> RuntimeLocator<'a> {
        RuntimeLocator::new(self.runner, self.probe_timeout, self.platform)
    }

    fn installer_options(&self) -> CommandOptions {
        CommandOptions::visible(self.installer_stdout)
    }

    fn probe_options(&self) -> CommandOptions {
        CommandOptions::probe(self.probe_timeout)
    }
}

/// One way of installing the package.
pub trait InstallStrategy {
    /// Short name used in logs and the attempt diagnostic.
    fn name(&self) -> &str;

    /// Human description for progress messages.
    fn describe(&self) -> String;

    /// Whether this strategy applies on this host at all.
    ///
    /// Inapplicable strategies are skipped without an attempt entry.
    fn is_applicable(&self, _ctx: &InstallContext<'_>) -> std::result::Result<(), FailureReason> {
        Ok(())
    }

    /// Install and verify, recording every command run into `log`.
    fn attempt(
        &self,
        ctx: &InstallContext<'_>,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
        log: &mut AttemptLog,
    ) -> StrategyResult;
}

/// Configurable strategy names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    Direct,
    User,
    Pipx,
    BootstrapPipx,
}

impl StrategyKind {
    /// Default order.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Direct,
        StrategyKind::User,
        StrategyKind::Pipx,
        StrategyKind::BootstrapPipx,
    ];

    pub fn build(self) -> Box<dyn InstallStrategy> {
        match self {
            StrategyKind::Direct => Box::new(DirectInstall),
            StrategyKind::User => Box::new(UserInstall),
            StrategyKind::Pipx => Box::new(PipxInstall::new()),
            StrategyKind::BootstrapPipx => Box::new(BootstrapPipx),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Direct => "direct",
            StrategyKind::User => "user",
            StrategyKind::Pipx => "pipx",
            StrategyKind::BootstrapPipx => "bootstrap-pipx",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<python> -m pip install <package>`.
pub struct DirectInstall;

impl InstallStrategy for DirectInstall {
    fn name(&self) -> &str {
        "direct"
    }

    fn describe(&self) -> String {
        "pip".to_string()
    }

    fn attempt(
        &self,
        ctx: &InstallContext<'_>,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
        log: &mut AttemptLog,
    ) -> StrategyResult {
        let command = pip_install(runtime, package, &[]);
        install_then_verify(ctx, self.name(), &command, log, || {
            verify_under(ctx, runtime, package)
        })
    }
}

/// `<python> -m pip install --user <package>`.
pub struct UserInstall;

impl InstallStrategy for UserInstall {
    fn name(&self) -> &str {
        "user"
    }

    fn describe(&self) -> String {
        "pip --user".to_string()
    }

    fn attempt(
        &self,
        ctx: &InstallContext<'_>,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
        log: &mut AttemptLog,
    ) -> StrategyResult {
        let command = pip_install(runtime, package, &["--user"]);
        install_then_verify(ctx, self.name(), &command, log, || {
            verify_under(ctx, runtime, package).map_err(|diagnostic| {
                format!("{} (is the user site-packages directory disabled?)", diagnostic)
            })
        })
    }
}

/// `pipx install <package>` into an isolated environment.
///
/// Verification runs against the interpreter of that environment, and
/// that interpreter is what the service is later started with.
pub struct PipxInstall {
    name: &'static str,
}

impl PipxInstall {
    pub fn new() -> Self {
        Self { name: "pipx" }
    }

    /// The single retry made after pipx itself was bootstrapped.
    pub fn retry() -> Self {
        Self {
            name: "pipx (retry)",
        }
    }
}

impl Default for PipxInstall {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallStrategy for PipxInstall {
    fn name(&self) -> &str {
        self.name
    }

    fn describe(&self) -> String {
        "pipx (isolated environment)".to_string()
    }

    fn attempt(
        &self,
        ctx: &InstallContext<'_>,
        _runtime: &RuntimeHandle,
        package: &PackageSpec,
        log: &mut AttemptLog,
    ) -> StrategyResult {
        let command = CommandSpec::new("pipx").args(["install", package.name.as_str()]);

        if !pipx_available(ctx) {
            let reason = FailureReason::ToolUnavailable {
                tool: "pipx".to_string(),
            };
            log.record_failure(self.name, &command, reason.clone(), None);
            return Err(reason);
        }

        install_then_verify(ctx, self.name, &command, log, || {
            ensure_path(ctx);
            isolated_runtime(ctx, package)
        })
    }
}

/// Install pipx with the system package manager, then retry pipx once.
pub struct BootstrapPipx;

impl InstallStrategy for BootstrapPipx {
    fn name(&self) -> &str {
        "bootstrap-pipx"
    }

    fn describe(&self) -> String {
        "pipx, installing pipx first".to_string()
    }

    fn is_applicable(&self, ctx: &InstallContext<'_>) -> std::result::Result<(), FailureReason> {
        if ctx.platform.system_package_manager().is_none() {
            return Err(FailureReason::NotApplicable {
                reason: "no supported system package manager".to_string(),
            });
        }
        if pipx_available(ctx) {
            return Err(FailureReason::NotApplicable {
                reason: "pipx is already available".to_string(),
            });
        }
        Ok(())
    }

    fn attempt(
        &self,
        ctx: &InstallContext<'_>,
        runtime: &RuntimeHandle,
        package: &PackageSpec,
        log: &mut AttemptLog,
    ) -> StrategyResult {
        let Some(manager) = ctx.platform.system_package_manager() else {
            return Err(FailureReason::NotApplicable {
                reason: "no supported system package manager".to_string(),
            });
        };

        let command = manager.install_command("pipx");
        tracing::info!("{}: running {}", self.name(), command);
        if let Err(reason) = run_installer(ctx, &command) {
            log.record_failure(self.name(), &command, reason.clone(), None);
            return Err(reason);
        }
        log.record_success(self.name(), &command);

        PipxInstall::retry().attempt(ctx, runtime, package, log)
    }
}

fn pip_install(runtime: &RuntimeHandle, package: &PackageSpec, extra: &[&str]) -> CommandSpec {
    runtime
        .command_spec()
        .args(["-m", "pip", "install"])
        .args(extra.iter().copied())
        .arg(package.name.as_str())
}

fn run_installer(ctx: &InstallContext<'_>, command: &CommandSpec) -> Result<(), FailureReason> {
    match ctx.runner.run(command, &ctx.installer_options()) {
        Ok(result) if result.success => Ok(()),
        Ok(result) => Err(FailureReason::CommandFailed {
            code: result.exit_code,
        }),
        Err(e) => Err(FailureReason::CouldNotStart {
            message: e.to_string(),
        }),
    }
}

/// Run `command`; when it exits 0, run `verify` and record the outcome.
///
/// `verify` returns the runtime that now imports the package, or a
/// diagnostic explaining why the package is still missing.
fn install_then_verify(
    ctx: &InstallContext<'_>,
    strategy_name: &str,
    command: &CommandSpec,
    log: &mut AttemptLog,
    verify: impl FnOnce() -> Result<RuntimeHandle, String>,
) -> StrategyResult {
    tracing::info!("{}: running {}", strategy_name, command);

    if let Err(reason) = run_installer(ctx, command) {
        log.record_failure(strategy_name, command, reason.clone(), None);
        return Err(reason);
    }

    match verify() {
        Ok(runtime) => {
            log.record_success(strategy_name, command);
            Ok(runtime)
        }
        Err(diagnostic) => {
            tracing::warn!("{}: {}", strategy_name, diagnostic);
            let reason = FailureReason::PackageAbsentAfterInstall;
            log.record_failure(strategy_name, command, reason.clone(), Some(diagnostic));
            Err(reason)
        }
    }
}

fn verify_under(
    ctx: &InstallContext<'_>,
    runtime: &RuntimeHandle,
    package: &PackageSpec,
) -> Result<RuntimeHandle, String> {
    if ctx.probe().is_installed(runtime, &package.import_name) {
        Ok(runtime.clone())
    } else {
        Err(format!(
            "import {} still fails under {}",
            package.import_name, runtime.command
        ))
    }
}

fn pipx_available(ctx: &InstallContext<'_>) -> bool {
    ctx.runner
        .succeeds(&CommandSpec::new("pipx").arg("--version"), &ctx.probe_options())
}

fn ensure_path(ctx: &InstallContext<'_>) {
    let command = CommandSpec::new("pipx").arg("ensurepath");
    if !ctx.runner.succeeds(&command, &ctx.probe_options()) {
        tracing::debug!("{} failed; continuing", command);
    }
}

/// Directory holding pipx's per-application environments.
fn pipx_venvs_dir(ctx: &InstallContext<'_>) -> Option<PathBuf> {
    let query = CommandSpec::new("pipx").args(["environment", "--value", "PIPX_LOCAL_VENVS"]);
    match ctx.runner.run(&query, &ctx.probe_options()) {
        Ok(result) if result.success && !result.stdout.trim().is_empty() => {
            Some(PathBuf::from(result.stdout.trim()))
        }
        _ => {
            // pipx releases without `environment --value` used this layout.
            tracing::debug!("{} failed; assuming ~/.local/pipx/venvs", query);
            dirs::home_dir().map(|home| home.join(".local").join("pipx").join("venvs"))
        }
    }
}

fn isolated_runtime(
    ctx: &InstallContext<'_>,
    package: &PackageSpec,
) -> Result<RuntimeHandle, String> {
    let venvs = pipx_venvs_dir(ctx)
        .ok_or_else(|| "could not determine the pipx environments directory".to_string())?;
    let python = ctx.platform.venv_python(&venvs.join(&package.name));
    let command = python.to_string_lossy().into_owned();

    let runtime = ctx
        .locator()
        .probe_candidate(&command)
        .ok_or_else(|| format!("{} is not a working interpreter", command))?;
    verify_under(ctx, &runtime, package)
}
