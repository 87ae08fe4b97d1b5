//! Unix installer script generation

use super::{write_output, ResolvedProject, SQPACKAGER_VERSION};
use crate::error::Result;
use crate::project::files::ReleaseFileKind;
use crate::templates::{Resource, TemplateMapping, TemplateSource};
use colored::Colorize;
use std::path::PathBuf;

/// Name of the generated script, placed in the project base path
pub const INSTALLER_FILE_NAME: &str = "sqpackager_unix_installer.sh";

/// qmake `DEFINES` the installer passes to the build
const DEFINE_INSTALLED: &str = "SQ_INSTALLED";
const DEFINE_INSTALL_PREFIX: &str = "SQ_INSTALL_PREFIX";
const DEFINE_APP_SHARE: &str = "SQ_APP_SHARE";

/// One installer command per release file, in declaration order
pub fn release_files_string(project: &ResolvedProject) -> String {
    let base_path = &project.definition.base_path;
    let mut out = String::new();

    for file in &project.definition.release_files {
        let line = match file.kind(base_path) {
            ReleaseFileKind::LocalDirectory => format!(
                "install_directory \"{}\" \"{}\"\n",
                file.source, file.destination
            ),
            ReleaseFileKind::LocalFile { executable } => format!(
                "install_file \"{}\" \"{}\" \"{}\"\n",
                file.source,
                file.destination,
                if executable { "755" } else { "644" }
            ),
            ReleaseFileKind::Remote => format!(
                "download_file \"{}\" \"{}\"\n",
                file.source, file.destination
            ),
        };
        out.push_str(&line);
    }
    out
}

/// Values for the installer template
pub fn installer_mapping(project: &ResolvedProject) -> TemplateMapping {
    let def = &project.definition;
    let mut mapping = TemplateMapping::new();
    let mut set = |key: &str, value: &str| {
        mapping.insert(key.to_string(), value.to_string());
    };

    set("SQPACKAGER_VERSION", SQPACKAGER_VERSION);
    set("VERSION", project.version());
    set("PRO_FILE", &def.pro_file.to_string_lossy());
    set("PROJECT_TARGET", &def.target_name);
    set("APPLICATION_NAME", &def.unix_normalized_name);
    set(
        "DESKTOP_FILE",
        def.desktop_file
            .as_deref()
            .unwrap_or(&def.desktop_file_normalized_name),
    );
    set(
        "NORMALIZED_DESKTOP_FILE_NAME",
        &def.desktop_file_normalized_name,
    );
    set("DEBIAN_PACKAGE_NAME", &def.debian_package_name);
    set(
        "NORMALIZED_PROJECT_ICON_PATH",
        &def.desktop_icon_normalized_name,
    );
    set("DEFINE_INSTALLED", DEFINE_INSTALLED);
    set("DEFINE_INSTALL_PREFIX", DEFINE_INSTALL_PREFIX);
    set("DEFINE_APP_SHARE", DEFINE_APP_SHARE);
    set("DEFAULT_QMAKE_EXEC", project.qt_version.qmake_exec());
    set("QT_MODULES", &project.qt_modules.join(" "));
    set("LICENSE_FILE", &project.license.file_name);

    let icon = def.desktop_icon.as_deref().unwrap_or(&def.icon);
    if !icon.is_empty() {
        set("HAS_ICON", "");
        set("PROJECT_ICON_FILE", icon);
    }
    if project.license.is_identified() {
        set("HAS_LICENSE_NAME", "");
        set("LICENSE_NAME", &project.license.license_name);
    }
    if let Some(readme) = &project.readme {
        set("HAS_README", "");
        set("README", readme);
    }
    if let Some(dir) = &def.translation_dir {
        set("HAS_TRANSLATIONS", "");
        set("TRANSLATION_DIR", dir);
    }
    if let Some(maintainer) = &def.debian_maintainer {
        let value = match &def.debian_maintainer_mail {
            Some(mail) => format!("{} <{}>", maintainer, mail),
            None => maintainer.clone(),
        };
        set("HAS_MAINTAINER", "");
        set("MAINTAINER", &value);
    }

    if !def.release_files.is_empty() {
        let files = release_files_string(project);
        set("HAS_RELEASE_FILES", "");
        set("RELEASE_FILES_STRING", &files);
    }

    mapping
}

/// Render and write the installer script, returning its path
pub fn generate_installer(
    project: &ResolvedProject,
    templates: &TemplateSource,
) -> Result<PathBuf> {
    println!("{}", "Creating Unix install file".cyan());

    let mapping = installer_mapping(project);
    let content = templates.render(Resource::UnixInstaller, &mapping)?;
    let path = project.definition.base_path.join(INSTALLER_FILE_NAME);
    write_output(&path, &content)?;
    make_executable(&path)?;

    println!("  {} {}", "File created:".green(), INSTALLER_FILE_NAME);
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        crate::error::PackagerError::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &std::path::Path) -> Result<()> {
    Ok(())
}
