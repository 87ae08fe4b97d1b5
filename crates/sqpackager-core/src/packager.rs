//! Packaging pipeline: resolve the project, then render its files

use crate::error::Result;
use crate::generate::{archive, desktop, installer, manpage, ResolvedProject};
use crate::metadata::{find_readme, resolve_license, VersionResolver, VersionSpec};
use crate::project::ProjectDefinition;
use crate::runtime::check::{detect_qt_version, find_qt_modules};
use crate::runtime::runner::ProcessRunner;
use crate::templates::TemplateSource;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Runs the packaging steps with one process runner and template source
pub struct Packager<R: ProcessRunner> {
    runner: R,
    templates: TemplateSource,
    today: NaiveDate,
}

impl<R: ProcessRunner> Packager<R> {
    pub fn new(runner: R, templates: TemplateSource) -> Self {
        Self {
            runner,
            templates,
            today: Local::now().date_naive(),
        }
    }

    /// Use a fixed date instead of the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Settle version, license, readme and Qt version for `definition`
    pub fn resolve(&self, definition: ProjectDefinition) -> Result<ResolvedProject> {
        let base_path = definition.base_path.clone();

        let version = VersionResolver::new(&self.runner)
            .with_today(self.today)
            .resolve(
                VersionSpec::from_hint(definition.version.as_deref()),
                &base_path,
            )?;

        let license = resolve_license(
            definition.license_file.as_deref(),
            definition.license_name.as_deref(),
            &base_path,
        )?;

        let readme = find_readme(&base_path);
        if readme.is_none() {
            tracing::debug!(path = %base_path.display(), "no readme found");
        }

        let qt_version = detect_qt_version(definition.qt_version, &base_path, &self.runner);
        let qt_modules = find_qt_modules(&definition.pro_file);

        Ok(ResolvedProject {
            definition,
            version,
            license,
            readme,
            qt_version,
            qt_modules,
        })
    }

    pub fn installer(&self, project: &ResolvedProject) -> Result<PathBuf> {
        installer::generate_installer(project, &self.templates)
    }

    pub fn manpage(&self, project: &ResolvedProject) -> Result<PathBuf> {
        manpage::generate_manpage(project, &self.templates, self.today)
    }

    pub fn desktop_entry(&self, project: &ResolvedProject) -> Result<Option<PathBuf>> {
        desktop::generate_desktop_entry(project, &self.templates)
    }

    /// Installer, man page and desktop entry, in that order
    pub fn generate_all(&self, project: &ResolvedProject) -> Result<Vec<PathBuf>> {
        let mut written = vec![self.installer(project)?, self.manpage(project)?];
        written.extend(self.desktop_entry(project)?);
        Ok(written)
    }

    pub fn archive(&self, project: &ResolvedProject, version: Option<&str>) -> Result<PathBuf> {
        archive::create_archive(project, &self.runner, version)
    }
}
