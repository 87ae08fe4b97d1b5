//! Packaging file generation
//!
//! Each generator turns a [`ResolvedProject`] into a template mapping and
//! renders one resource. Nothing is written until the mapping is complete.

pub mod archive;
pub mod desktop;
pub mod installer;
pub mod manpage;

use crate::error::{PackagerError, Result};
use crate::metadata::{LicenseInfo, VersionSpec};
use crate::project::ProjectDefinition;
use crate::runtime::check::QtMajorVersion;
use std::path::Path;

pub use archive::create_archive;
pub use desktop::desktop_mapping;
pub use installer::installer_mapping;
pub use manpage::manpage_mapping;

/// Version of this packager, exposed to templates
pub const SQPACKAGER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A project with every ambiguous value settled
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub definition: ProjectDefinition,
    pub version: VersionSpec,
    pub license: LicenseInfo,
    /// Readme file name relative to the base path
    pub readme: Option<String>,
    pub qt_version: QtMajorVersion,
    pub qt_modules: Vec<String>,
}

impl ResolvedProject {
    pub fn version(&self) -> &str {
        &self.version.resolved
    }
}

/// Write a generated file, creating nothing else
pub(crate) fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| PackagerError::OutputUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::metadata::VersionKind;
    use crate::project::files::Platform;
    use std::path::PathBuf;

    /// A resolved project rooted at `base_path`
    pub fn resolved_project(base_path: &Path, json: &str) -> ResolvedProject {
        let definition = ProjectDefinition::from_json(
            json,
            Path::new("sqproject.json"),
            PathBuf::from(base_path),
            Platform::Linux,
        )
        .unwrap();

        ResolvedProject {
            definition,
            version: VersionSpec {
                kind: VersionKind::Forced,
                forced_value: Some("1.2.0".to_string()),
                resolved: "1.2.0".to_string(),
                ..VersionSpec::default()
            },
            license: LicenseInfo {
                file_name: "LICENSE".to_string(),
                license_name: "GPL-3".to_string(),
            },
            readme: None,
            qt_version: QtMajorVersion::Qt6,
            qt_modules: vec!["core".to_string(), "gui".to_string()],
        }
    }
}
