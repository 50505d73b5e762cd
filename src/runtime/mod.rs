//! Python runtime discovery.
//!
//! - [`version`] - `major.minor` parsing and version floors
//! - [`locator`] - first-match interpreter lookup over a candidate list

pub mod locator;
pub mod version;

pub use locator::{RuntimeHandle, RuntimeLocator};
pub use version::{parse_major_minor, MajorMinor, VersionFloor};
