//! sqpackager core - packaging metadata resolution and file generation
//!
//! This library turns a loosely specified Qt project description into the
//! files needed to ship it: a Unix installer script, a man page, a desktop
//! entry and a source archive.
//!
//! # Architecture
//!
//! - **Project** - JSON project description loading and release file classification
//! - **Metadata** - version (user value, git, date) and license resolution
//! - **Templates** - a small line-oriented template language and its resources
//! - **Generate** - one generator per packaging file, plus `tar` archives
//! - **Runtime** - the process runner every external tool goes through
//!
//! # Example Usage
//!
//! ```ignore
//! use sqpackager_core::{Packager, ProjectDefinition, SystemRunner, TemplateSource};
//!
//! let definition = ProjectDefinition::load(None)?;
//! let packager = Packager::new(SystemRunner, TemplateSource::Embedded);
//! let project = packager.resolve(definition)?;
//! packager.generate_all(&project)?;
//! ```

pub mod error;
pub mod generate;
pub mod metadata;
pub mod packager;
pub mod project;
pub mod runtime;
pub mod templates;

// Re-export main types for convenience
pub use error::{PackagerError, Result};
pub use generate::ResolvedProject;
pub use metadata::{LicenseInfo, VersionKind, VersionSpec};
pub use packager::Packager;
pub use project::files::{classify, Platform, ReleaseFileEntry};
pub use project::ProjectDefinition;
pub use runtime::{ProcessRunner, RecordingRunner, SystemRunner};
pub use templates::{render, TemplateMapping, TemplateSource};
