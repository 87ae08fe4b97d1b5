//! Template resources, embedded or read from a local directory

use super::engine::{render, TemplateMapping};
use crate::error::{PackagerError, Result};
use std::borrow::Cow;
use std::path::PathBuf;

/// A template shipped with the packager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    UnixInstaller,
    ManPage,
    DesktopEntry,
}

impl Resource {
    /// File name of the resource inside a template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::UnixInstaller => "unix_install.tt",
            Resource::ManPage => "manpage.tt",
            Resource::DesktopEntry => "desktop.tt",
        }
    }

    fn embedded(&self) -> &'static str {
        match self {
            Resource::UnixInstaller => include_str!("../../templates/unix_install.tt"),
            Resource::ManPage => include_str!("../../templates/manpage.tt"),
            Resource::DesktopEntry => include_str!("../../templates/desktop.tt"),
        }
    }
}

/// Where template resources come from
#[derive(Debug, Clone, Default)]
pub enum TemplateSource {
    /// Templates compiled into the binary
    #[default]
    Embedded,
    /// A directory holding files named after [`Resource::file_name`]
    Local(PathBuf),
}

impl TemplateSource {
    /// Use `dir` when given, the embedded templates otherwise
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map(Self::Local).unwrap_or_default()
    }

    /// Load the text of a resource
    pub fn load(&self, resource: Resource) -> Result<Cow<'static, str>> {
        match self {
            TemplateSource::Embedded => Ok(Cow::Borrowed(resource.embedded())),
            TemplateSource::Local(dir) => {
                let path = dir.join(resource.file_name());
                std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| PackagerError::TemplateResourceUnreadable { path, source })
            }
        }
    }

    /// Load and render a resource
    pub fn render(&self, resource: Resource, mapping: &TemplateMapping) -> Result<String> {
        let text = self.load(resource)?;
        Ok(render(&text, mapping))
    }
}
