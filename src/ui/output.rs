//! Output verbosity.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::shell::OutputRouting;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Show everything, including attempt commands and installer output.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show warnings and final status only.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows progress messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows warnings and success lines.
    pub fn shows_warnings(&self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Check if this mode shows extra detail such as the commands being run.
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Where installer stdout goes, given where it would go when visible.
    ///
    /// Quiet modes discard it; stderr from installers is never discarded.
    pub fn installer_routing(&self, visible: OutputRouting) -> OutputRouting {
        if self.shows_status() {
            visible
        } else {
            OutputRouting::Null
        }
    }
}
