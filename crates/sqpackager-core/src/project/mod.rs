//! Project description loading
//!
//! The project is described by a JSON file (`sqproject.json` by default).
//! Loading only reads and normalizes the raw values; versions, licenses and
//! the Qt version are resolved later by [`crate::Packager`].

pub mod files;

use crate::error::{PackagerError, Result};
use crate::runtime::check::QtVersionHint;
use colored::Colorize;
use files::{classify, Platform, ReleaseFileEntry};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use files::{PlatformGate, ReleaseFileKind};

/// Default project description file name
pub const DEFAULT_PROJECT_FILE: &str = "sqproject.json";

/// Raw project description as written by the user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_mail: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub org: String,
    pub pro_file: Option<String>,
    pub project_base_path: Option<String>,
    pub license_file: Option<String>,
    pub license_name: Option<String>,
    pub version: Option<String>,
    pub qt_major_version: Option<String>,
    pub target_name: Option<String>,
    pub translations_dir: Option<String>,
    /// Destination -> source, in declaration order
    #[serde(default)]
    pub files: serde_json::Map<String, serde_json::Value>,
    pub desktop_file: Option<String>,
    pub desktop_icon: Option<String>,
    #[serde(default)]
    pub desktop_categories: Vec<String>,
    pub debian_maintainer: Option<String>,
    pub debian_maintainer_mail: Option<String>,
}

/// A project description with defaults applied and paths made absolute
#[derive(Debug, Clone)]
pub struct ProjectDefinition {
    pub name: String,
    pub target_name: String,
    pub author: String,
    pub author_mail: String,
    pub short_description: String,
    pub description: String,
    pub icon: String,
    pub org: String,
    /// Directory holding the project description
    pub base_path: PathBuf,
    /// Root of the sources that get archived
    pub project_base_path: PathBuf,
    pub pro_file: PathBuf,
    pub license_file: Option<String>,
    pub license_name: Option<String>,
    pub version: Option<String>,
    pub qt_version: QtVersionHint,
    pub translation_dir: Option<String>,
    pub release_files: Vec<ReleaseFileEntry>,
    pub desktop_file: Option<String>,
    pub desktop_file_normalized_name: String,
    pub desktop_icon: Option<String>,
    pub desktop_icon_normalized_name: String,
    pub categories: Vec<String>,
    pub debian_package_name: String,
    pub unix_normalized_name: String,
    pub debian_maintainer: Option<String>,
    pub debian_maintainer_mail: Option<String>,
}

impl ProjectDefinition {
    /// Load `path`, or `sqproject.json` in the current directory
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let json_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_FILE));

        let content =
            std::fs::read_to_string(&json_path).map_err(|source| PackagerError::ConfigUnreadable {
                path: json_path.clone(),
                source,
            })?;

        let base_path = std::path::absolute(&json_path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::from_json(&content, &json_path, base_path, Platform::host())
    }

    /// Build a definition from JSON text; `origin` is only used in errors
    pub fn from_json(
        content: &str,
        origin: &Path,
        base_path: PathBuf,
        host: Platform,
    ) -> Result<Self> {
        let malformed = |message: String| PackagerError::ConfigMalformed {
            path: origin.to_path_buf(),
            message,
        };

        let raw: ProjectFile =
            serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

        let mut declared = Vec::with_capacity(raw.files.len());
        for (destination, source) in &raw.files {
            let source = source.as_str().ok_or_else(|| {
                malformed(format!("files entry '{}' must be a string", destination))
            })?;
            declared.push((destination.as_str(), source));
        }

        let release_files = classify(declared, host);
        let qt_version = QtVersionHint::parse(raw.qt_major_version.as_deref().unwrap_or(""))?;

        println!("Project name is: {}", raw.name.cyan());
        Ok(Self::from_raw(raw, base_path, qt_version, release_files))
    }

    fn from_raw(
        raw: ProjectFile,
        base_path: PathBuf,
        qt_version: QtVersionHint,
        release_files: Vec<ReleaseFileEntry>,
    ) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let pro_file = match non_empty(raw.pro_file) {
            Some(pro) => base_path.join(pro),
            None => base_path.join(format!("{}.pro", raw.name)),
        };
        let project_base_path = match non_empty(raw.project_base_path) {
            Some(dir) => base_path.join(dir),
            None => base_path.clone(),
        };

        let desktop_icon = non_empty(raw.desktop_icon);
        let icon_ext = desktop_icon
            .as_deref()
            .or(Some(raw.icon.as_str()).filter(|i| !i.is_empty()))
            .and_then(|icon| Path::new(icon).extension())
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "png".to_string());

        Self {
            target_name: non_empty(raw.target_name).unwrap_or_else(|| raw.name.clone()),
            desktop_file_normalized_name: format!("{}.{}.desktop", raw.org, raw.name),
            desktop_icon_normalized_name: format!("{}.{}.{}", raw.org, raw.name, icon_ext),
            debian_package_name: raw.name.to_lowercase(),
            unix_normalized_name: raw
                .name
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .to_lowercase(),
            name: raw.name,
            author: raw.author,
            author_mail: raw.author_mail,
            short_description: raw.short_description,
            description: raw.description,
            icon: raw.icon,
            org: raw.org,
            base_path,
            project_base_path,
            pro_file,
            license_file: non_empty(raw.license_file),
            license_name: non_empty(raw.license_name),
            version: non_empty(raw.version),
            qt_version,
            translation_dir: non_empty(raw.translations_dir),
            release_files,
            desktop_file: non_empty(raw.desktop_file),
            desktop_icon,
            categories: raw.desktop_categories,
            debian_maintainer: non_empty(raw.debian_maintainer),
            debian_maintainer_mail: non_empty(raw.debian_maintainer_mail),
        }
    }
}
