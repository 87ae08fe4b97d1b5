//! Source archive creation through `tar`

use super::{write_output, ResolvedProject};
use crate::error::{PackagerError, Result};
use crate::runtime::runner::ProcessRunner;
use colored::Colorize;
use std::path::PathBuf;

/// qmake include carrying the resolved version into archived builds
pub const FORCED_VERSION_FILE: &str = "sq_project_forced_version.pri";

/// Create `<dir>-<version>.tar.gz` in the project base path.
///
/// `version` overrides the resolved version in the archive name only; the
/// forced-version include always carries the resolved one.
pub fn create_archive<R: ProcessRunner>(
    project: &ResolvedProject,
    runner: &R,
    version: Option<&str>,
) -> Result<PathBuf> {
    let root = &project.definition.project_base_path;
    let version = version.unwrap_or(project.version());
    let dir_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| project.definition.debian_package_name.clone());
    let prefix = format!("{}-{}", dir_name, version);
    let archive_name = format!("{}.tar.gz", prefix);
    let archive_path = root.join(&archive_name);

    println!("{} {}", "Creating archive".cyan(), archive_name);

    let pri_path = root.join(FORCED_VERSION_FILE);
    write_output(
        &pri_path,
        &format!("SQ_PROJECT_FORCED_VERSION = {}\n", project.version()),
    )?;

    let transform = format!("s,^,{}/,", prefix);
    let exclude_self = format!("./{}", archive_name);
    let mut args = vec!["--transform", transform.as_str(), "--exclude", exclude_self.as_str()];
    if root.join(".git").exists() {
        args.extend(["--exclude", ".git*"]);
    }
    args.extend(["--exclude-vcs", "-zcf", archive_path.to_str().unwrap_or(&archive_name), "."]);

    let out = runner.run("tar", root, &args);

    if let Err(e) = std::fs::remove_file(&pri_path) {
        tracing::debug!(path = %pri_path.display(), error = %e, "could not remove forced version file");
    }

    if !out.success {
        return Err(PackagerError::ArchiveFailed { path: archive_path });
    }

    println!("  {} {}", "Archive created:".green(), archive_path.display());
    Ok(archive_path)
}
