//! Locating well-known files by naming convention

use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

/// Return the first entry of `dir` whose name contains `keyword`, ignoring case.
///
/// Only visible immediate children are considered, visited in file-name
/// order ignoring case. An unreadable directory has no matches.
pub fn find_entry(dir: &Path, keyword: &str) -> Option<String> {
    let keyword = keyword.to_lowercase();

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by(|a, b| sort_key(a.file_name()).cmp(&sort_key(b.file_name())))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .find(|name| name.to_lowercase().contains(&keyword))
}

fn sort_key(name: &OsStr) -> (String, String) {
    let name = name.to_string_lossy();
    (name.to_lowercase(), name.into_owned())
}

/// Locate a readme file in `base_path`
pub fn find_readme(base_path: &Path) -> Option<String> {
    find_entry(base_path, "readme")
}
