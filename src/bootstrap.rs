//! Locate, ensure, supervise.
//!
//! [`Bootstrap`] ties the configured runtime candidates, install chain and
//! package together. The launcher runs the whole sequence through
//! [`launch`]; `pyboot-setup` uses the individual stages.

use crate::config::LauncherConfig;
use crate::error::{PybootError, Result};
use crate::requirements::{InstallChain, InstallContext, Installation};
use crate::runtime::RuntimeHandle;
use crate::shell::{CommandRunner, OutputRouting, Platform, SystemRunner};
use crate::supervisor::{supervise, ServiceCommand};
use crate::ui::UserInterface;

/// The bootstrap stages for one configuration.
#[derive(Clone, Copy)]
pub struct Bootstrap<'a> {
    config: &'a LauncherConfig,
    runner: &'a dyn CommandRunner,
    platform: Platform,
}

impl<'a> Bootstrap<'a> {
    pub fn new(config: &'a LauncherConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            platform: Platform::current(),
        }
    }

    /// Use a specific platform's package manager and hints.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        self.config
    }

    /// Context shared by probes, strategies and the uninstaller.
    ///
    /// Installer stdout goes to stderr so stdout stays clean for the
    /// service protocol (or the client snippet printed by `pyboot-setup`).
    pub fn install_context(&self) -> InstallContext<'a> {
        InstallContext::new(
            self.runner,
            self.platform,
            self.config.runtime.probe_timeout(),
        )
        .with_installer_stdout(self.config.output.installer_routing(OutputRouting::Stderr))
    }

    /// Find the first configured interpreter meeting the version floor.
    pub fn locate_runtime(&self) -> Result<RuntimeHandle> {
        let floor = self
            .config
            .runtime
            .floor()
            .map_err(|message| PybootError::ConfigValidationError { message })?;

        self.install_context()
            .locator()
            .locate(&self.config.runtime.candidates, floor)
    }

    /// Locate the runtime and make the package importable under it.
    pub fn prepare(&self, ui: &mut dyn UserInterface) -> Result<Installation> {
        let runtime = self.locate_runtime()?;
        ui.detail(&format!("Using {} ({})", runtime.command, runtime.version_string));

        let chain = InstallChain::from_kinds(&self.config.install.strategies);
        chain.ensure_installed(
            &self.install_context(),
            ui,
            &runtime,
            &self.config.package_spec(),
        )
    }

    /// `<runtime> -m <module> <forwarded...>` in the configured directory.
    pub fn service_command(&self, installation: &Installation, forwarded: &[String]) -> ServiceCommand {
        ServiceCommand::python_module(
            &installation.runtime.command,
            &self.config.package.module,
            forwarded,
        )
        .in_dir(self.config.supervisor.working_dir.clone())
    }
}

/// Run the launcher end to end and return the process exit code.
///
/// Fatal errors are reported through `ui` with their remediation text.
pub fn launch(config: &LauncherConfig, ui: &mut dyn UserInterface, forwarded: &[String]) -> i32 {
    let runner = SystemRunner;
    let bootstrap = Bootstrap::new(config, &runner);

    let outcome = bootstrap.prepare(ui).and_then(|installation| {
        let command = bootstrap.service_command(&installation, forwarded);
        tracing::debug!("starting {}", command.spec());
        supervise(&command)
    });

    match outcome {
        Ok(code) => code,
        Err(err) => {
            report_error(ui, &err);
            err.exit_code()
        }
    }
}

/// Print a fatal error and its remediation, if it has one.
pub fn report_error(ui: &mut dyn UserInterface, err: &PybootError) {
    ui.error(&err.to_string());
    if let Some(remediation) = err.remediation() {
        ui.show_hint(remediation);
    }
}
