//! Import probes.
//!
//! "Installed" means "importable by this interpreter": the probe runs
//! `<runtime> -c "import <name>"` and looks only at the exit status. It
//! never installs, never writes, and is bounded by the probe timeout.
//!
//! # Example
//!
//! ```
//! use pyboot::requirements::probe::PackageProbe;
//! use pyboot::runtime::{MajorMinor, RuntimeHandle};
//! use pyboot::shell::{MockResponse, MockRunner};
//! use std::time::Duration;
//!
//! let runner = MockRunner::new();
//! runner.on("python3 -c \"import visidata_mcp\"", MockResponse::ok());
//!
//! let runtime = RuntimeHandle {
//!     command: "python3".to_string(),
//!     version_string: "Python 3.11.2".to_string(),
//!     major_minor: MajorMinor::new(3, 11),
//! };
//! let probe = PackageProbe::new(&runner, Duration::from_secs(5));
//! assert!(probe.is_installed(&runtime, "visidata_mcp"));
//! assert!(!probe.is_installed(&runtime, "missing_pkg"));
//! ```

use serde::Serialize;
use std::time::Duration;

use crate::runtime::RuntimeHandle;
use crate::shell::{CommandOptions, CommandRunner};

use super::status::PackageSpec;

/// Answers "does this interpreter import that package?".
pub struct PackageProbe<'a> {
    runner: &'a dyn CommandRunner,
    timeout: Duration,
}

impl<'a> PackageProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// Whether `import <import_name>` succeeds under `runtime`.
    pub fn is_installed(&self, runtime: &RuntimeHandle, import_name: &str) -> bool {
        let installed = self.run_snippet(runtime, &format!("import {}", import_name)).0;
        tracing::debug!(
            "{} {} importable by {}",
            import_name,
            if installed { "is" } else { "is not" },
            runtime.command
        );
        installed
    }

    /// Run the staged checks the service needs to start.
    ///
    /// Stages run in order and stop at the first failure: the package
    /// import, the service module import, then the `main` entrypoint.
    pub fn verify(&self, runtime: &RuntimeHandle, package: &PackageSpec) -> VerificationReport {
        let stages = [
            ("package import", format!("import {}", package.import_name)),
            ("service module", format!("import {}", package.module)),
            (
                "service entrypoint",
                format!("from {} import main", package.module),
            ),
        ];

        let mut report = VerificationReport {
            runtime: runtime.command.clone(),
            version: runtime.version_string.clone(),
            stages: Vec::new(),
        };

        for (name, code) in stages {
            let (passed, detail) = self.run_snippet(runtime, &code);
            report.stages.push(VerificationStage {
                name: name.to_string(),
                code,
                passed,
                detail,
            });
            if !passed {
                break;
            }
        }

        report
    }

    fn run_snippet(&self, runtime: &RuntimeHandle, code: &str) -> (bool, Option<String>) {
        let spec = runtime.command_spec().args(["-c", code]);
        match self.runner.run(&spec, &CommandOptions::probe(self.timeout)) {
            Ok(result) if result.success => (true, None),
            Ok(result) if result.timed_out => (false, Some(format!("timed out: {}", spec))),
            Ok(result) => (false, last_line(&result.stderr)),
            Err(e) => (false, Some(e.to_string())),
        }
    }
}

/// The last non-empty line of an error stream, which for Python is the
/// exception message.
fn last_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// One staged check.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationStage {
    pub name: String,
    /// Python snippet that was run.
    pub code: String,
    pub passed: bool,
    /// Failure detail, usually the exception line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of [`PackageProbe::verify`].
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub runtime: String,
    pub version: String,
    pub stages: Vec<VerificationStage>,
}

impl VerificationReport {
    /// True when all three stages ran and passed.
    pub fn all_passed(&self) -> bool {
        self.stages.len() == 3 && self.stages.iter().all(|s| s.passed)
    }

    /// The first failing stage, if any.
    pub fn first_failure(&self) -> Option<&VerificationStage> {
        self.stages.iter().find(|s| !s.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MajorMinor;
    use crate::shell::{MockResponse, MockRunner};

    fn runtime() -> RuntimeHandle {
        RuntimeHandle {
            command: "python3".to_string(),
            version_string: "Python 3.11.2".to_string(),
            major_minor: MajorMinor::new(3, 11),
        }
    }

    fn package() -> PackageSpec {
        PackageSpec::new("visidata-mcp", "visidata_mcp", "visidata_mcp.server")
    }

    #[test]
    fn installed_when_import_exits_zero() {
        let runner = MockRunner::new();
        runner.on("python3 -c \"import visidata_mcp\"", MockResponse::ok());
        let probe = PackageProbe::new(&runner, Duration::from_secs(5));

        assert!(probe.is_installed(&runtime(), "visidata_mcp"));
        assert_eq!(runner.calls()[0].timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn absent_when_import_fails_or_times_out() {
        let runner = MockRunner::new();
        runner.on("python3 -c \"import a\"", MockResponse::exit(1));
        runner.on("python3 -c \"import b\"", MockResponse::Timeout);
        let probe = PackageProbe::new(&runner, Duration::from_secs(5));

        assert!(!probe.is_installed(&runtime(), "a"));
        assert!(!probe.is_installed(&runtime(), "b"));
    }

    #[test]
    fn verify_passes_all_stages() {
        let runner = MockRunner::new();
        runner
            .on("python3 -c \"import visidata_mcp\"", MockResponse::ok())
            .on("python3 -c \"import visidata_mcp.server\"", MockResponse::ok())
            .on(
                "python3 -c \"from visidata_mcp.server import main\"",
                MockResponse::ok(),
            );
        let probe = PackageProbe::new(&runner, Duration::from_secs(5));

        let report = probe.verify(&runtime(), &package());
        assert!(report.all_passed());
        assert_eq!(report.stages.len(), 3);
    }

    #[test]
    fn verify_stops_at_first_failure() {
        let runner = MockRunner::new();
        runner.on("python3 -c \"import visidata_mcp\"", MockResponse::ok());
        runner.on(
            "python3 -c \"import visidata_mcp.server\"",
            MockResponse::Exit {
                code: 1,
                stdout: String::new(),
                stderr: "Traceback (most recent call last):\nModuleNotFoundError: No module named 'mcp'\n"
                    .to_string(),
            },
        );
        let probe = PackageProbe::new(&runner, Duration::from_secs(5));

        let report = probe.verify(&runtime(), &package());
        assert!(!report.all_passed());
        assert_eq!(report.stages.len(), 2);
        let failure = report.first_failure().unwrap();
        assert_eq!(failure.name, "service module");
        assert_eq!(
            failure.detail.as_deref(),
            Some("ModuleNotFoundError: No module named 'mcp'")
        );
        assert!(!runner.was_called("python3 -c \"from visidata_mcp.server import main\""));
    }

    #[test]
    fn report_serializes_without_empty_detail() {
        let runner = MockRunner::new();
        runner.on("python3 -c \"import visidata_mcp\"", MockResponse::exit(1));
        let probe = PackageProbe::new(&runner, Duration::from_secs(5));

        let json = serde_json::to_value(probe.verify(&runtime(), &package())).unwrap();
        assert_eq!(json["runtime"], "python3");
        assert_eq!(json["stages"][0]["passed"], false);
        assert!(json["stages"][0].get("detail").is_none());
    }

    #[test]
    fn last_line_skips_trailing_blank_lines() {
        assert_eq!(last_line("a\nb\n\n").as_deref(), Some("b"));
        assert!(last_line("  \n").is_none());
    }
}
