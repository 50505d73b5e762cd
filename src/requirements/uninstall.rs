//! Best-effort removal of the package.
//!
//! Nothing here fails: a missing interpreter, a package that was never
//! installed, or a package manager that refuses are all reported and
//! logged, never propagated.

use crate::runtime::RuntimeHandle;
use crate::shell::{CommandOptions, CommandSpec};
use crate::ui::UserInterface;

use super::status::PackageSpec;
use super::strategy::InstallContext;

/// What happened to one installation of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// No interpreter to uninstall from.
    NoRuntime,
    /// The package was not installed there; nothing was run.
    NotInstalled,
    Removed,
    RemovalFailed { code: Option<i32> },
}

/// Outcomes for the interpreter's environment and for pipx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub pip: UninstallOutcome,
    /// `None` when pipx is unavailable or does not manage the package.
    pub pipx: Option<UninstallOutcome>,
}

impl UninstallReport {
    /// Whether anything was actually removed.
    pub fn removed_any(&self) -> bool {
        self.pip == UninstallOutcome::Removed || self.pipx == Some(UninstallOutcome::Removed)
    }
}

/// Remove `package` from `runtime`'s environment and from pipx.
pub fn uninstall(
    ctx: &InstallContext<'_>,
    ui: &mut dyn UserInterface,
    runtime: Option<&RuntimeHandle>,
    package: &PackageSpec,
) -> UninstallReport {
    let pip = match runtime {
        None => {
            tracing::info!("no Python runtime found; nothing to uninstall");
            UninstallOutcome::NoRuntime
        }
        Some(runtime) => pip_uninstall(ctx, ui, runtime, package),
    };

    let pipx = if pipx_manages(ctx, package) {
        let command = CommandSpec::new("pipx").args(["uninstall", package.name.as_str()]);
        ui.message(&format!("Removing {} from pipx...", package.name));
        Some(run_removal(ctx, &command))
    } else {
        None
    };

    UninstallReport { pip, pipx }
}

fn pip_uninstall(
    ctx: &InstallContext<'_>,
    ui: &mut dyn UserInterface,
    runtime: &RuntimeHandle,
    package: &PackageSpec,
) -> UninstallOutcome {
    if !ctx.probe().is_installed(runtime, &package.import_name) {
        tracing::info!("{} is not installed for {}", package.name, runtime.command);
        return UninstallOutcome::NotInstalled;
    }

    ui.message(&format!("Uninstalling {}...", package.name));
    let command = runtime
        .command_spec()
        .args(["-m", "pip", "uninstall", "-y", package.name.as_str()]);
    run_removal(ctx, &command)
}

fn run_removal(ctx: &InstallContext<'_>, command: &CommandSpec) -> UninstallOutcome {
    tracing::debug!("running {}", command);
    match ctx
        .runner
        .run(command, &CommandOptions::visible(ctx.installer_stdout))
    {
        Ok(result) if result.success => UninstallOutcome::Removed,
        Ok(result) => {
            tracing::info!("{} exited with {:?}", command, result.exit_code);
            UninstallOutcome::RemovalFailed {
                code: result.exit_code,
            }
        }
        Err(e) => {
            tracing::info!("{}", e);
            UninstallOutcome::RemovalFailed { code: None }
        }
    }
}

/// Whether `pipx list --short` lists the package.
fn pipx_manages(ctx: &InstallContext<'_>, package: &PackageSpec) -> bool {
    let list = CommandSpec::new("pipx").args(["list", "--short"]);
    match ctx
        .runner
        .run(&list, &CommandOptions::probe(ctx.probe_timeout))
    {
        Ok(result) if result.success => result
            .stdout
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .any(|name| name == package.name),
        _ => false,
    }
}
