//! Supervision state machine.
//!
//! [`Supervision`] turns [`SupervisorEvent`]s into decisions. It owns no
//! process and no signal handlers, so it can be driven by tests directly.

use super::signal::SignalRelay;

/// A signal pyboot forwards to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaySignal {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
}

/// Something the supervisor has to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorEvent {
    Signal(RelaySignal),
    /// The child exited; `None` when no exit code was reported.
    ChildExited(Option<i32>),
}

/// Lifecycle of the supervised child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Starting,
    Running { pid: u32 },
    Exited { code: i32 },
}

/// What the driver does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep waiting.
    Continue,
    /// Exit the process with this code.
    Exit(i32),
}

#[derive(Debug)]
pub struct Supervision {
    state: ChildState,
    /// SIGINT already reaches the child from the terminal.
    terminal_interrupt: bool,
}

impl Default for Supervision {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervision {
    pub fn new() -> Self {
        Self {
            state: ChildState::Starting,
            terminal_interrupt: false,
        }
    }

    /// Stop relaying SIGINT when the terminal delivers it to the child's
    /// process group, so the child sees each Ctrl-C once.
    pub fn with_terminal_interrupt(mut self, delivered: bool) -> Self {
        self.terminal_interrupt = delivered;
        self
    }

    pub fn state(&self) -> ChildState {
        self.state
    }

    /// Record that the child is running as `pid`.
    pub fn started(&mut self, pid: u32) {
        if self.state == ChildState::Starting {
            self.state = ChildState::Running { pid };
        }
    }

    /// React to one event.
    ///
    /// A signal is relayed once to a running child and never ends
    /// supervision by itself. The child's exit ends it with the child's
    /// code, or 0 when none was reported.
    pub fn handle(&mut self, event: SupervisorEvent, relay: &dyn SignalRelay) -> Step {
        match (event, self.state) {
            (_, ChildState::Exited { code }) => Step::Exit(code),
            (SupervisorEvent::Signal(RelaySignal::Interrupt), ChildState::Running { pid })
                if self.terminal_interrupt =>
            {
                tracing::debug!("{} already received SIGINT from the terminal", pid);
                Step::Continue
            }
            (SupervisorEvent::Signal(signal), ChildState::Running { pid }) => {
                tracing::debug!("relaying {:?} to {}", signal, pid);
                if let Err(e) = relay.relay(pid, signal) {
                    tracing::warn!("could not relay {:?} to {}: {}", signal, pid, e);
                }
                Step::Continue
            }
            (SupervisorEvent::Signal(signal), ChildState::Starting) => {
                tracing::debug!("{:?} received before the child started", signal);
                Step::Continue
            }
            (SupervisorEvent::ChildExited(code), _) => {
                let code = code.unwrap_or(0);
                tracing::debug!("child exited with {}", code);
                self.state = ChildState::Exited { code };
                Step::Exit(code)
            }
        }
    }
}
