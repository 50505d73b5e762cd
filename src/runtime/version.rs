//! Interpreter version parsing and floor matching.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A `major.minor` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MajorMinor {
    pub major: u32,
    pub minor: u32,
}

impl MajorMinor {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for MajorMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Minimum acceptable interpreter version.
///
/// A version satisfies the floor when its major equals the floor's major
/// and its minor is at least the floor's minor. A newer major does not
/// satisfy it: Python 4 would be a different language as far as the
/// service is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionFloor(pub MajorMinor);

impl VersionFloor {
    pub fn new(major: u32, minor: u32) -> Self {
        Self(MajorMinor::new(major, minor))
    }

    /// Whether `version` meets this floor.
    pub fn is_satisfied_by(&self, version: MajorMinor) -> bool {
        version.major == self.0.major && version.minor >= self.0.minor
    }
}

impl fmt::Display for VersionFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for VersionFloor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (major, minor) = trimmed
            .split_once('.')
            .ok_or_else(|| format!("expected MAJOR.MINOR, got '{}'", s))?;
        let major = major
            .parse()
            .map_err(|_| format!("invalid major version in '{}'", s))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid minor version in '{}'", s))?;
        Ok(Self::new(major, minor))
    }
}

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(\d+)\.(\d+)").ok())
        .as_ref()
}

/// Extract the first `major.minor` from version output.
///
/// `"Python 3.11.2"` yields `3.11`.
pub fn parse_major_minor(output: &str) -> Option<MajorMinor> {
    let caps = version_pattern()?.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    Some(MajorMinor::new(major, minor))
}
