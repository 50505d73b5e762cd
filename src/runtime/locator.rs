//! Interpreter discovery.
//!
//! The [`RuntimeLocator`] walks an ordered candidate list (`python3`,
//! `python`, ...) and returns the first interpreter whose `--version`
//! output meets the floor. It is first-match, not best-match: a later
//! candidate with a higher version never wins over an earlier acceptable one.
//!
//! # Example
//!
//! ```
//! use pyboot::runtime::{RuntimeLocator, VersionFloor};
//! use pyboot::shell::{MockResponse, MockRunner, Platform};
//! use std::time::Duration;
//!
//! let runner = MockRunner::new();
//! runner.on("python3 --version", MockResponse::stdout("Python 3.12.1"));
//!
//! let locator = RuntimeLocator::new(&runner, Duration::from_secs(5), Platform::Linux);
//! let candidates = vec!["python3".to_string(), "python".to_string()];
//! let runtime = locator.locate(&candidates, VersionFloor::new(3, 10)).unwrap();
//! assert_eq!(runtime.command, "python3");
//! ```

use std::time::Duration;

use crate::error::{PybootError, Result};
use crate::shell::{CommandOptions, CommandRunner, CommandSpec, Platform};

use super::version::{parse_major_minor, MajorMinor, VersionFloor};

/// A located interpreter that met the caller's version floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeHandle {
    /// Command used to invoke it (a name resolved via PATH, or a path).
    pub command: String,
    /// Version output as reported, e.g. "Python 3.11.2".
    pub version_string: String,
    /// Parsed `major.minor`.
    pub major_minor: MajorMinor,
}

impl RuntimeHandle {
    /// Start a command line with this interpreter as the program.
    pub fn command_spec(&self) -> CommandSpec {
        CommandSpec::new(self.command.clone())
    }
}

/// Finds an installed interpreter satisfying a minimum version.
pub struct RuntimeLocator<'a> {
    runner: &'a dyn CommandRunner,
    probe_timeout: Duration,
    platform: Platform,
}

impl<'a> RuntimeLocator<'a> {
    /// Create a locator.
    pub fn new(runner: &'a dyn CommandRunner, probe_timeout: Duration, platform: Platform) -> Self {
        Self {
            runner,
            probe_timeout,
            platform,
        }
    }

    /// Return the first candidate whose version meets `floor`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeNotFound` if no candidate satisfies the floor. The
    /// error carries the highest version any candidate reported and the
    /// platform's install hint.
    pub fn locate(&self, candidates: &[String], floor: VersionFloor) -> Result<RuntimeHandle> {
        let mut best_seen: Option<RuntimeHandle> = None;

        for candidate in candidates {
            let Some(handle) = self.probe_candidate(candidate) else {
                continue;
            };

            if floor.is_satisfied_by(handle.major_minor) {
                tracing::debug!(
                    "using {} ({}) for floor {}",
                    handle.command,
                    handle.version_string,
                    floor
                );
                return Ok(handle);
            }

            tracing::debug!(
                "skipping {}: {} does not satisfy {}",
                candidate,
                handle.version_string,
                floor
            );
            if best_seen
                .as_ref()
                .is_none_or(|best| handle.major_minor > best.major_minor)
            {
                best_seen = Some(handle);
            }
        }

        Err(PybootError::RuntimeNotFound {
            floor: floor.to_string(),
            best_seen: best_seen.map(|h| h.version_string),
            hint: self.platform.python_install_hint(&floor.to_string()),
        })
    }

    /// Run `<command> --version` and describe the interpreter, regardless of any floor.
    ///
    /// Returns `None` if the command is missing, fails, times out, or prints
    /// no recognizable version.
    pub fn probe_candidate(&self, command: &str) -> Option<RuntimeHandle> {
        let spec = CommandSpec::new(command).arg("--version");
        let result = match self
            .runner
            .run(&spec, &CommandOptions::probe(self.probe_timeout))
        {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("skipping {}: not found", command);
                return None;
            }
        };

        if !result.success {
            tracing::debug!(
                "skipping {}: version query failed (exit {:?}, timed out: {})",
                command,
                result.exit_code,
                result.timed_out
            );
            return None;
        }

        // Python 2 prints its version on stderr.
        let (output, major_minor) = [result.stdout.trim(), result.stderr.trim()]
            .into_iter()
            .find_map(|text| parse_major_minor(text).map(|v| (text, v)))
            .or_else(|| {
                tracing::debug!("skipping {}: no version in output", command);
                None
            })?;

        Some(RuntimeHandle {
            command: command.to_string(),
            version_string: output.lines().next().unwrap_or(output).to_string(),
            major_minor,
        })
    }
}
