//! Platform detection and platform-specific hints.

use std::path::{Path, PathBuf};

use super::command::CommandSpec;

/// Host platform, as far as installation advice is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
}

impl Platform {
    /// Detect the current platform.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Whether this is the Windows-ish family.
    pub fn is_windows(self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// The system package manager pyboot knows how to drive, if any.
    ///
    /// Only Homebrew on macOS is used for bootstrapping tools; Linux
    /// distribution package managers need root and are left to the user.
    pub fn system_package_manager(self) -> Option<SystemPackageManager> {
        match self {
            Platform::MacOS => Some(SystemPackageManager::Homebrew),
            Platform::Linux | Platform::Windows => None,
        }
    }

    /// Multi-line instructions for installing Python.
    pub fn python_install_hint(self, floor: &str) -> String {
        if self.is_windows() {
            format!(
                "Please install Python {} or higher:\n  Download from https://python.org and enable \"Add python.exe to PATH\"",
                floor
            )
        } else {
            format!(
                "Please install Python {} or higher:\n  macOS: brew install python3\n  Ubuntu/Debian: sudo apt install python3 python3-pip",
                floor
            )
        }
    }

    /// Interpreter inside a virtual environment rooted at `venv`.
    pub fn venv_python(self, venv: &Path) -> PathBuf {
        if self.is_windows() {
            venv.join("Scripts").join("python.exe")
        } else {
            venv.join("bin").join("python")
        }
    }

    /// Shell line that activates a virtual environment called `venv`.
    pub fn venv_activate(self, venv: &str) -> String {
        if self.is_windows() {
            format!("{}\\Scripts\\activate", venv)
        } else {
            format!("source {}/bin/activate", venv)
        }
    }
}

/// A system package manager that can install helper tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPackageManager {
    Homebrew,
}

impl SystemPackageManager {
    /// Short name for logs and attempt diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            SystemPackageManager::Homebrew => "brew",
        }
    }

    /// Command that installs `tool`.
    pub fn install_command(self, tool: &str) -> CommandSpec {
        match self {
            SystemPackageManager::Homebrew => CommandSpec::new("brew").args(["install", tool]),
        }
    }
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}
