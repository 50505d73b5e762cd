//! pyboot - Bootstrap and supervise a Python-hosted MCP server.
//!
//! pyboot finds a Python interpreter new enough to run the service, makes
//! sure the service's package imports under it (trying an ordered chain of
//! install strategies when it does not), then runs the service as a child
//! process: stdio passes straight through, SIGINT and SIGTERM are relayed,
//! and the child's exit code becomes pyboot's.
//!
//! # Modules
//!
//! - [`bootstrap`] - Locate, ensure, supervise
//! - [`cli`] - Command-line interfaces and `pyboot-setup` commands
//! - [`config`] - Configuration loading, layering, and validation
//! - [`error`] - Error types, result alias, and exit codes
//! - [`requirements`] - Import probes, install strategies, and uninstall
//! - [`runtime`] - Interpreter discovery and version floors
//! - [`shell`] - External command execution and platform detection
//! - [`supervisor`] - Child process supervision and signal relay
//! - [`ui`] - Terminal output on stderr
//!
//! # Example
//!
//! ```
//! use pyboot::runtime::{RuntimeLocator, VersionFloor};
//! use pyboot::shell::{MockResponse, MockRunner, Platform};
//! use std::time::Duration;
//!
//! let runner = MockRunner::new();
//! runner.on("python3 --version", MockResponse::stdout("Python 3.8.1"));
//! runner.on("python --version", MockResponse::stdout("Python 3.11.2"));
//!
//! let locator = RuntimeLocator::new(&runner, Duration::from_secs(5), Platform::Linux);
//! let floor: VersionFloor = "3.10".parse().unwrap();
//! let candidates = vec!["python3".to_string(), "python".to_string()];
//!
//! let runtime = locator.locate(&candidates, floor).unwrap();
//! assert_eq!(runtime.command, "python");
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod requirements;
pub mod runtime;
pub mod shell;
pub mod supervisor;
pub mod ui;

pub use error::{PybootError, Result};
