//! Supervising the service process.
//!
//! - [`state`] - The pure state machine deciding what each event means
//! - [`signal`] - Forwarding signals to the child
//! - [`process`] - Spawning the child and driving the state machine

pub mod process;
pub mod signal;
pub mod state;

pub use process::{supervise, supervise_with, ServiceCommand};
pub use signal::{terminal_delivers_interrupt, KillRelay, SignalRelay};
pub use state::{ChildState, RelaySignal, Step, SupervisorEvent, Supervision};
