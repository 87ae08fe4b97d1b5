//! License file discovery and identification

use super::scan::find_entry;
use crate::error::{PackagerError, Result};
use colored::Colorize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How many leading bytes of the license file are inspected
const HEADER_PROBE_LEN: u64 = 512;

/// Common spellings that do not match a short code directly.
/// Checked in order, first hit wins.
const NAME_CORRECTIONS: &[(&str, &str)] = &[
    ("LGPLv3", "LGPL-3"),
    ("LGPL3", "LGPL-3"),
    ("LGPLv2", "LGPL-2"),
    ("LGPL2", "LGPL-2"),
    ("GPLv3", "GPL-3"),
    ("GPL3", "GPL-3"),
    ("GPLv2", "GPL-2"),
    ("GPL2", "GPL-2"),
    ("Apache2", "Apache-2.0"),
    ("MPL2", "MPL-2.0"),
];

/// License short names understood by Debian packaging.
///
/// Every entry is tested and the last hit is kept, so for
/// `LICENSE-LGPL-2.1` the answer is `LGPL`, not `LGPL-2.1`.
const DEBIAN_LICENSES: &[&str] = &[
    "Apache-2.0",
    "CC0-1.0",
    "GFDL-1.3",
    "GPL-2",
    "LGPL-2",
    "MPL-1.1",
    "Artistic",
    "GFDL",
    "GPL",
    "GPL-3",
    "LGPL-2.1",
    "MPL-2.0",
    "BSD",
    "GFDL-1.2",
    "GPL-1",
    "LGPL",
    "LGPL-3",
];

/// Opening lines of well-known license texts
const LICENSE_HEADERS: &[(&str, &str)] = &[
    (
        "GNU GENERAL PUBLIC LICENSE\n                       Version 3, 29 June 2007",
        "GPL-3",
    ),
    (
        "GNU LESSER GENERAL PUBLIC LICENSE\n                       Version 3, 29 June 2007",
        "LGPL-3",
    ),
    (
        "GNU GENERAL PUBLIC LICENSE\n                       Version 2, June 1991",
        "GPL-2",
    ),
];

/// The project license
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseInfo {
    /// Path relative to the project base path
    pub file_name: String,
    /// Short identifier such as `GPL-3`; empty when unidentified
    pub license_name: String,
}

impl LicenseInfo {
    pub fn is_identified(&self) -> bool {
        !self.license_name.is_empty()
    }
}

/// Determine the license file and name for the project at `base_path`.
///
/// A missing license file is fatal. An unidentified name is not.
pub fn resolve_license(
    file_hint: Option<&str>,
    name_hint: Option<&str>,
    base_path: &Path,
) -> Result<LicenseInfo> {
    let file_hint = file_hint.filter(|s| !s.is_empty());
    let name_hint = name_hint.filter(|s| !s.is_empty());

    if let (Some(file), Some(name)) = (file_hint, name_hint) {
        return Ok(LicenseInfo {
            file_name: file.to_string(),
            license_name: name.to_string(),
        });
    }

    let file_name = match file_hint {
        Some(file) => file.to_string(),
        None => {
            println!("Trying to find a License file");
            find_license_file(base_path).ok_or_else(|| PackagerError::LicenseFileNotFound {
                path: base_path.to_path_buf(),
            })?
        }
    };

    if let Some(name) = name_hint {
        return Ok(LicenseInfo {
            file_name,
            license_name: name.to_string(),
        });
    }

    println!("Trying to find the License Name");
    let license_name = match name_from_file_name(&file_name) {
        Some(name) => name.to_string(),
        None => name_from_header(&base_path.join(&file_name))?
            .unwrap_or_default()
            .to_string(),
    };

    if license_name.is_empty() {
        tracing::warn!("Could not identify the license in {}", file_name);
    } else {
        println!("  License name is {}", license_name.green());
    }

    Ok(LicenseInfo {
        file_name,
        license_name,
    })
}

/// British spelling is looked for first
fn find_license_file(base_path: &Path) -> Option<String> {
    find_entry(base_path, "licence").or_else(|| find_entry(base_path, "license"))
}

fn name_from_file_name(file_name: &str) -> Option<&'static str> {
    if let Some((_, name)) = NAME_CORRECTIONS
        .iter()
        .find(|(pattern, _)| file_name.contains(pattern))
    {
        return Some(name);
    }

    let mut found = None;
    for code in DEBIAN_LICENSES {
        if file_name.contains(code) {
            found = Some(*code);
        }
    }
    found
}

fn name_from_header(path: &Path) -> Result<Option<&'static str>> {
    let unreadable = |source| PackagerError::LicenseContentUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unreadable)?;
    let mut head = Vec::new();
    file.take(HEADER_PROBE_LEN)
        .read_to_end(&mut head)
        .map_err(unreadable)?;

    let head = collapse_whitespace(&String::from_utf8_lossy(&head));
    Ok(LICENSE_HEADERS
        .iter()
        .find(|(header, _)| head.starts_with(&collapse_whitespace(header)))
        .map(|(_, name)| *name))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GPL3_TEXT: &str = "                    GNU GENERAL PUBLIC LICENSE\n                       Version 3, 29 June 2007\n\n Copyright (C) 2007 Free Software Foundation, Inc.\n";

    #[test]
    fn test_both_hints_skip_discovery() {
        // The directory does not even exist
        let info = resolve_license(Some("COPYING"), Some("MIT"), Path::new("/nonexistent")).unwrap();
        assert_eq!(info.file_name, "COPYING");
        assert_eq!(info.license_name, "MIT");
    }

    #[test]
    fn test_british_spelling_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), "x").unwrap();
        fs::write(dir.path().join("LICENCE"), "x").unwrap();

        let info = resolve_license(None, Some("BSD"), dir.path()).unwrap();
        assert_eq!(info.file_name, "LICENCE");
    }

    #[test]
    fn test_license_discovery_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.cpp"), "").unwrap();
        fs::write(dir.path().join("License.md"), "x").unwrap();

        let info = resolve_license(None, Some("BSD"), dir.path()).unwrap();
        assert_eq!(info.file_name, "License.md");
    }

    #[test]
    fn test_missing_license_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "x").unwrap();

        let err = resolve_license(None, None, dir.path()).unwrap_err();
        assert!(matches!(err, PackagerError::LicenseFileNotFound { .. }));
    }

    #[test]
    fn test_name_correction_from_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE.GPL3"), "whatever").unwrap();

        let info = resolve_license(None, None, dir.path()).unwrap();
        assert_eq!(info.license_name, "GPL-3");
    }

    #[test]
    fn test_lgpl_correction_not_taken_for_gpl() {
        assert_eq!(name_from_file_name("COPYING.LGPLv3"), Some("LGPL-3"));
        assert_eq!(name_from_file_name("COPYING.GPLv2"), Some("GPL-2"));
    }

    #[test]
    fn test_debian_code_last_match_wins() {
        assert_eq!(name_from_file_name("LICENSE-GPL-3"), Some("GPL-3"));
        assert_eq!(name_from_file_name("LICENSE-LGPL-2.1"), Some("LGPL"));
        assert_eq!(name_from_file_name("LICENSE-Apache-2.0"), Some("Apache-2.0"));
        assert_eq!(name_from_file_name("LICENSE"), None);
    }

    #[test]
    fn test_header_fingerprint_gpl3() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), GPL3_TEXT).unwrap();

        let info = resolve_license(None, None, dir.path()).unwrap();
        assert_eq!(info.file_name, "LICENSE");
        assert_eq!(info.license_name, "GPL-3");
        assert!(info.is_identified());
    }

    #[test]
    fn test_header_fingerprint_only_reads_leading_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let text = format!("{}{}", " ".repeat(600), GPL3_TEXT);
        fs::write(dir.path().join("LICENSE"), text).unwrap();

        let info = resolve_license(None, None, dir.path()).unwrap();
        assert_eq!(info.license_name, "");
    }

    #[test]
    fn test_unknown_license_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), "Do what you want.").unwrap();

        let info = resolve_license(None, None, dir.path()).unwrap();
        assert_eq!(info.file_name, "LICENSE");
        assert!(!info.is_identified());
    }

    #[test]
    fn test_hinted_file_unreadable_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_license(Some("docs/LICENSE"), None, dir.path()).unwrap_err();
        assert!(matches!(err, PackagerError::LicenseContentUnreadable { .. }));
    }

    #[test]
    fn test_discovery_skips_hidden_license_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".licenserc.yaml"), "header: {}").unwrap();
        fs::write(dir.path().join("LICENSE"), "x").unwrap();

        let info = resolve_license(None, Some("Apache-2.0"), dir.path()).unwrap();
        assert_eq!(info.file_name, "LICENSE");
        assert_eq!(info.license_name, "Apache-2.0");
    }

    #[test]
    fn test_discovery_uses_case_insensitive_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LICENSE"), "x").unwrap();
        fs::write(dir.path().join("gpl-license.txt"), "x").unwrap();

        let info = resolve_license(None, Some("GPL-3"), dir.path()).unwrap();
        assert_eq!(info.file_name, "gpl-license.txt");
    }

    #[test]
    fn test_hinted_file_is_read_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("COPY"), GPL3_TEXT).unwrap();

        let info = resolve_license(Some("docs/COPY"), None, dir.path()).unwrap();
        assert_eq!(info.license_name, "GPL-3");
    }
}
