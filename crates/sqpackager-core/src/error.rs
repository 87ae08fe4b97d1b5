//! Error kinds that abort a packaging run

use std::path::PathBuf;
use thiserror::Error;

/// Every error here is fatal for the current run.
///
/// Recoverable situations (unidentified license name, missing readme,
/// missing template key) never surface as a `PackagerError`; they are
/// reported as warnings and the run continues.
#[derive(Debug, Error)]
pub enum PackagerError {
    #[error("Can't open the project description file {}: {source}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing the description file {}: {message}", path.display())]
    ConfigMalformed { path: PathBuf, message: String },

    #[error("Git is not usable in {}", path.display())]
    VcsUnavailable { path: PathBuf },

    #[error("Did not manage to determine a version using git in {}", path.display())]
    VcsQueryFailed { path: PathBuf },

    #[error(
        "Can't find a license file in {}, please set the license-file field if you don't use an obvious license file name",
        path.display()
    )]
    LicenseFileNotFound { path: PathBuf },

    #[error("Can't open the license file {}: {source}", path.display())]
    LicenseContentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't open template file {}: {source}", path.display())]
    TemplateResourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not create the {} file: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown qt-major-version '{value}' (expected qt5, 5, qt6, 6 or auto)")]
    AmbiguousQtMajorVersion { value: String },

    #[error("Failed to create the archive {}", path.display())]
    ArchiveFailed { path: PathBuf },
}

/// Result alias used throughout the library
pub type Result<T, E = PackagerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_single_line() {
        let errors = vec![
            PackagerError::VcsUnavailable {
                path: PathBuf::from("/tmp/project"),
            },
            PackagerError::LicenseFileNotFound {
                path: PathBuf::from("/tmp/project"),
            },
            PackagerError::AmbiguousQtMajorVersion {
                value: "qt4".to_string(),
            },
        ];

        for error in errors {
            assert!(!error.to_string().contains('\n'));
        }
    }

    #[test]
    fn test_qt_version_message_names_value() {
        let error = PackagerError::AmbiguousQtMajorVersion {
            value: "qt4".to_string(),
        };
        assert!(error.to_string().contains("'qt4'"));
    }
}
