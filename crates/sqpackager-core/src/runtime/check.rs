//! Qt toolchain detection

use super::runner::ProcessRunner;
use crate::error::{PackagerError, Result};
use std::fmt;
use std::path::Path;

/// Qt major version the project builds against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QtMajorVersion {
    Qt5,
    Qt6,
}

impl QtMajorVersion {
    pub fn display_name(&self) -> &'static str {
        match self {
            QtMajorVersion::Qt5 => "Qt5",
            QtMajorVersion::Qt6 => "Qt6",
        }
    }

    /// qmake executable shipped with this Qt version on most distributions
    pub fn qmake_exec(&self) -> &'static str {
        match self {
            QtMajorVersion::Qt5 => "qmake",
            QtMajorVersion::Qt6 => "qmake6",
        }
    }
}

impl fmt::Display for QtMajorVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The `qt-major-version` setting before detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QtVersionHint {
    #[default]
    Auto,
    Fixed(QtMajorVersion),
}

impl QtVersionHint {
    /// Parse a `qt-major-version` value; empty means auto
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(QtVersionHint::Auto),
            "qt5" | "5" => Ok(QtVersionHint::Fixed(QtMajorVersion::Qt5)),
            "qt6" | "6" => Ok(QtVersionHint::Fixed(QtMajorVersion::Qt6)),
            _ => Err(PackagerError::AmbiguousQtMajorVersion {
                value: value.to_string(),
            }),
        }
    }
}

/// Resolve the hint, probing the installed qmake when set to auto.
///
/// `qmake6` answering at all means Qt6. Otherwise plain `qmake` is asked
/// for its Qt version. An inconclusive probe falls back to Qt6.
pub fn detect_qt_version<R: ProcessRunner>(
    hint: QtVersionHint,
    base_path: &Path,
    runner: &R,
) -> QtMajorVersion {
    if let QtVersionHint::Fixed(version) = hint {
        return version;
    }

    if runner.run("qmake6", base_path, &["-v"]).success {
        tracing::debug!("qmake6 found, using Qt6");
        return QtMajorVersion::Qt6;
    }

    let query = runner.run("qmake", base_path, &["-query", "QT_VERSION"]);
    match query.trimmed() {
        Some(v) if v.starts_with("5.") => QtMajorVersion::Qt5,
        Some(v) if v.starts_with("6.") => QtMajorVersion::Qt6,
        _ => {
            tracing::warn!("Could not detect the Qt version, assuming Qt6");
            QtMajorVersion::Qt6
        }
    }
}

/// Read the module list from the first `QT += ...` line of a .pro file.
///
/// Returns an empty list when the file is missing or has no such line.
pub fn find_qt_modules(pro_file: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(pro_file) else {
        return Vec::new();
    };

    for line in content.lines() {
        let Some((lhs, rhs)) = line.split_once("+=") else {
            continue;
        };
        if lhs.trim() == "QT" {
            return rhs.split_whitespace().map(str::to_string).collect();
        }
    }
    Vec::new()
}
