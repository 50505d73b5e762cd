//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`], which writes styled lines to stderr
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use pyboot::ui::{OutputMode, TerminalUI, UserInterface};
//!
//! let mut ui = TerminalUI::with_colors(OutputMode::Quiet, false);
//! ui.success("visidata-mcp is installed");
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, PybootTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a progress message.
    fn message(&mut self, msg: &str);

    /// Display a secondary detail, such as a command line. Verbose only.
    fn detail(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Always shown.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show remediation text. Always shown.
    fn show_hint(&mut self, hint: &str);
}
