//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! Responses are keyed by the rendered command line; every invocation is
//! recorded for later assertion. Commands with no scripted response behave
//! like a program that is not on PATH.
//!
//! # Example
//!
//! ```
//! use pyboot::shell::{CommandOptions, CommandRunner, CommandSpec, MockResponse, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.on("python3 --version", MockResponse::stdout("Python 3.11.2"));
//!
//! let spec = CommandSpec::new("python3").arg("--version");
//! let result = runner.run(&spec, &CommandOptions::default()).unwrap();
//! assert!(result.stdout.contains("3.11.2"));
//! assert!(runner.was_called("python3 --version"));
//! assert!(!runner.succeeds(&CommandSpec::new("pipx"), &CommandOptions::default()));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{PybootError, Result};

use super::command::{CommandOptions, CommandResult, CommandRunner, CommandSpec, OutputRouting};

/// A scripted outcome for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The program ran and exited with `code`.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program could not be started.
    NotFound,
    /// The program hit its timeout.
    Timeout,
}

impl MockResponse {
    /// Exit 0 with no output.
    pub fn ok() -> Self {
        Self::exit(0)
    }

    /// Exit with `code` and no output.
    pub fn exit(code: i32) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Exit 0 printing `out` on stdout.
    pub fn stdout(out: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: out.to_string(),
            stderr: String::new(),
        }
    }

    /// Exit 0 printing `err` on stderr.
    pub fn stderr(err: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: String::new(),
            stderr: err.to_string(),
        }
    }
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Rendered command line.
    pub command: String,
    /// Where stdout was routed.
    pub stdout: OutputRouting,
    /// Timeout the caller asked for.
    pub timeout: Option<Duration>,
}

/// Scripted [`CommandRunner`].
///
/// Each command line has a queue of responses. Queued responses are
/// consumed in order; the last one is sticky and answers every further call.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<HashMap<String, VecDeque<MockResponse>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockRunner {
    /// Create a runner where every command is "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for a command line.
    ///
    /// Calling `on` repeatedly for the same command line queues responses.
    pub fn on(&self, command: &str, response: MockResponse) -> &Self {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// All recorded invocations, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines of all invocations, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.command.clone()).collect()
    }

    /// Whether `command` was invoked at least once.
    pub fn was_called(&self, command: &str) -> bool {
        self.call_count(command) > 0
    }

    /// How many times `command` was invoked.
    pub fn call_count(&self, command: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.command == command)
            .count()
    }

    fn next_response(&self, command: &str) -> MockResponse {
        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(MockResponse::NotFound),
            Some(queue) => queue.front().cloned().unwrap_or(MockResponse::NotFound),
            None => MockResponse::NotFound,
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult> {
        let command = spec.to_string();
        self.calls.borrow_mut().push(RecordedCall {
            command: command.clone(),
            stdout: options.stdout,
            timeout: options.timeout,
        });

        match self.next_response(&command) {
            MockResponse::Exit {
                code: 0,
                stdout,
                stderr,
            } => Ok(CommandResult::success(stdout, stderr, Duration::ZERO)),
            MockResponse::Exit {
                code,
                stdout,
                stderr,
            } => Ok(CommandResult::failure(
                Some(code),
                stdout,
                stderr,
                Duration::ZERO,
            )),
            MockResponse::Timeout => Ok(CommandResult::timeout(Duration::ZERO)),
            MockResponse::NotFound => Err(PybootError::CommandFailed { command, code: None }),
        }
    }
}
