//! External command execution.
//!
//! Every external program pyboot touches (version probes, import probes,
//! package managers) goes through the [`CommandRunner`] capability so the
//! locator, probe and install chain can be driven by a scripted
//! [`MockRunner`](super::MockRunner) in tests.

use crate::error::{PybootError, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a timed command is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// An argv-style command. Never interpreted by a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for CommandSpec {
    /// Renders a copy-pasteable command line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.argv().iter().map(|a| quote_arg(a)).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Where a child's output stream goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputRouting {
    /// Collect into [`CommandResult`].
    #[default]
    Capture,
    /// Share the parent's stream.
    Inherit,
    /// Write to the parent's stderr, keeping the parent's stdout clean.
    Stderr,
    /// Discard.
    Null,
}

impl OutputRouting {
    fn to_stdio(self) -> Stdio {
        match self {
            OutputRouting::Capture => Stdio::piped(),
            OutputRouting::Inherit => Stdio::inherit(),
            OutputRouting::Stderr => Stdio::from(std::io::stderr()),
            OutputRouting::Null => Stdio::null(),
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Standard output routing.
    pub stdout: OutputRouting,

    /// Standard error routing.
    pub stderr: OutputRouting,

    /// Kill the command after this long (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Captured output, bounded by `timeout`. Used for probes.
    pub fn probe(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }

    /// Output shown to the user, no timeout. Used for installers.
    ///
    /// `stdout` is usually [`OutputRouting::Inherit`], or
    /// [`OutputRouting::Stderr`] when our own stdout is a protocol channel.
    pub fn visible(stdout: OutputRouting) -> Self {
        Self {
            stdout,
            stderr: OutputRouting::Inherit,
            ..Default::default()
        }
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal or timeout).
    pub exit_code: Option<i32>,

    /// Standard output, when captured.
    pub stdout: String,

    /// Standard error, when captured.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed for exceeding its timeout.
    pub timed_out: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
            timed_out: false,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
            timed_out: false,
        }
    }

    /// Create a result for a command killed at its deadline.
    pub fn timeout(duration: Duration) -> Self {
        Self {
            timed_out: true,
            ..Self::failure(None, String::new(), String::new(), duration)
        }
    }
}

/// Capability to run external commands.
pub trait CommandRunner {
    /// Run `spec` to completion.
    ///
    /// Returns `Err(CommandFailed { code: None })` when the program could
    /// not be started at all. A program that started and exited non-zero,
    /// or was killed at its timeout, is an `Ok` result with `success == false`.
    fn run(&self, spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult>;

    /// Run `spec` and report only whether it exited 0.
    fn succeeds(&self, spec: &CommandSpec, options: &CommandOptions) -> bool {
        self.run(spec, options).map(|r| r.success).unwrap_or(false)
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, options: &CommandOptions) -> Result<CommandResult> {
        let start = Instant::now();

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        // A timed command leads its own process group, so the deadline
        // also reaches anything it forked.
        #[cfg(unix)]
        if options.timeout.is_some() {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        // Our own stdin may be the service's protocol channel.
        cmd.stdin(Stdio::null());
        cmd.stdout(options.stdout.to_stdio());
        cmd.stderr(options.stderr.to_stdio());

        let mut child = cmd.spawn().map_err(|e| {
            tracing::debug!("could not start `{}`: {}", spec, e);
            PybootError::CommandFailed {
                command: spec.to_string(),
                code: None,
            }
        })?;

        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = wait_with_deadline(&mut child, options.timeout).map_err(|e| {
            tracing::debug!("waiting on `{}` failed: {}", spec, e);
            PybootError::CommandFailed {
                command: spec.to_string(),
                code: None,
            }
        })?;

        let Some(status) = status else {
            // The readers are detached, not joined: a process that left the
            // group may still hold the pipes open.
            let duration = start.elapsed();
            tracing::debug!("`{}` timed out after {:?}", spec, duration);
            return Ok(CommandResult::timeout(duration));
        };

        let stdout = collect(stdout_reader);
        let stderr = collect(stderr_reader);
        let duration = start.elapsed();

        if status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }
}

/// Read a pipe to the end on a background thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

/// Wait for the child, killing it once `timeout` elapses.
///
/// Returns `Ok(None)` when the deadline was hit.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_process_group(child);
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// SIGKILL the process group the timed-out child leads.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) takes no pointers. The child is not yet reaped, so
    // its pid still names the group created at spawn.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
