//! Project metadata resolution
//!
//! This module provides:
//! - Version resolution (user value, git, date)
//! - License file discovery and license name identification
//! - Readme discovery and the directory scan both rely on

pub mod license;
pub mod scan;
pub mod version;

pub use license::{resolve_license, LicenseInfo};
pub use scan::{find_entry, find_readme};
pub use version::{resolve_version, VersionKind, VersionResolver, VersionSpec};
