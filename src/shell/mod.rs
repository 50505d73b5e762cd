//! External command execution and platform detection.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    CommandOptions, CommandResult, CommandRunner, CommandSpec, OutputRouting, SystemRunner,
};
pub use mock::{MockResponse, MockRunner, RecordedCall};
pub use platform::{is_ci, Platform, SystemPackageManager};
