//! Running the service as a supervised child.
//!
//! The child inherits stdin, stdout and stderr, so the service speaks its
//! protocol directly to whoever started pyboot. A current-thread tokio
//! runtime waits on two sources at once: the child's exit and SIGINT /
//! SIGTERM. Each event goes through [`Supervision`].

use std::path::PathBuf;
use std::process::Stdio;

use crate::error::{PybootError, Result};
use crate::shell::CommandSpec;

use super::signal::{terminal_delivers_interrupt, KillRelay, SignalRelay};
use super::state::{RelaySignal, Step, SupervisorEvent, Supervision};

/// The service process to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
}

impl ServiceCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
        }
    }

    /// `<runtime> -m <module> <forwarded...>`.
    pub fn python_module(runtime: &str, module: &str, forwarded: &[String]) -> Self {
        let mut args = vec!["-m".to_string(), module.to_string()];
        args.extend(forwarded.iter().cloned());
        Self::new(runtime, args)
    }

    pub fn in_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Printable form for messages.
    pub fn spec(&self) -> CommandSpec {
        CommandSpec::new(self.program.clone()).args(self.args.iter().cloned())
    }
}

/// Run the service until it exits and return the code pyboot should exit with.
///
/// # Errors
///
/// `SpawnFailed` if the process could not be created; `Io` if signal
/// handlers or the runtime could not be set up.
pub fn supervise(command: &ServiceCommand) -> Result<i32> {
    supervise_with(command, &KillRelay)
}

/// [`supervise`] with a custom relay.
pub fn supervise_with(command: &ServiceCommand, relay: &dyn SignalRelay) -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(command, relay))
}

async fn drive(command: &ServiceCommand, relay: &dyn SignalRelay) -> Result<i32> {
    // Listen before spawning so no signal falls between spawn and select.
    let mut signals = SignalListener::new()?;

    let mut cmd = tokio::process::Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = &command.working_dir {
        cmd.current_dir(dir);
    }

    tracing::debug!("starting {}", command.spec());
    let mut child = cmd.spawn().map_err(|e| PybootError::SpawnFailed {
        command: command.spec().to_string(),
        message: e.to_string(),
    })?;

    let mut supervision =
        Supervision::new().with_terminal_interrupt(terminal_delivers_interrupt());
    if let Some(pid) = child.id() {
        supervision.started(pid);
    }

    loop {
        let event = tokio::select! {
            status = child.wait() => SupervisorEvent::ChildExited(status?.code()),
            Some(signal) = signals.recv() => SupervisorEvent::Signal(signal),
        };

        if let Step::Exit(code) = supervision.handle(event, relay) {
            return Ok(code);
        }
    }
}

/// SIGINT and SIGTERM as one stream.
struct SignalListener {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl SignalListener {
    #[cfg(unix)]
    fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    fn new() -> std::io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(&mut self) -> Option<RelaySignal> {
        tokio::select! {
            received = self.interrupt.recv() => received.map(|_| RelaySignal::Interrupt),
            received = self.terminate.recv() => received.map(|_| RelaySignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> Option<RelaySignal> {
        tokio::signal::ctrl_c()
            .await
            .ok()
            .map(|_| RelaySignal::Interrupt)
    }
}
