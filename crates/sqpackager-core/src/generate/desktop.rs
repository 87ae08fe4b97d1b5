//! Freedesktop `.desktop` entry generation

use super::{write_output, ResolvedProject};
use crate::error::Result;
use crate::templates::{Resource, TemplateMapping, TemplateSource};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Values for the desktop entry template
pub fn desktop_mapping(project: &ResolvedProject) -> TemplateMapping {
    let def = &project.definition;
    let mut mapping = TemplateMapping::new();

    mapping.insert("NAME".to_string(), def.name.clone());
    mapping.insert("TARGET_NAME".to_string(), def.target_name.clone());

    if !def.short_description.is_empty() {
        mapping.insert("HAS_SHORT_DESCRIPTION".to_string(), String::new());
        mapping.insert(
            "SHORT_DESCRIPTION".to_string(),
            def.short_description.clone(),
        );
    }

    // Icons are looked up by name, without extension
    if def.desktop_icon.is_some() || !def.icon.is_empty() {
        let icon = Path::new(&def.desktop_icon_normalized_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        mapping.insert("HAS_ICON".to_string(), String::new());
        mapping.insert("ICON".to_string(), icon);
    }

    if !def.categories.is_empty() {
        let categories: String = def.categories.iter().map(|c| format!("{};", c)).collect();
        mapping.insert("HAS_CATEGORIES".to_string(), String::new());
        mapping.insert("CATEGORIES".to_string(), categories);
    }

    mapping
}

/// Render and write the desktop entry.
///
/// Returns `None` when the project ships its own desktop file.
pub fn generate_desktop_entry(
    project: &ResolvedProject,
    templates: &TemplateSource,
) -> Result<Option<PathBuf>> {
    let def = &project.definition;
    if let Some(existing) = &def.desktop_file {
        println!("Using the project desktop file {}", existing.cyan());
        return Ok(None);
    }

    println!("{}", "Creating desktop entry".cyan());
    let mapping = desktop_mapping(project);
    let content = templates.render(Resource::DesktopEntry, &mapping)?;
    let path = def.base_path.join(&def.desktop_file_normalized_name);
    write_output(&path, &content)?;

    println!(
        "  {} {}",
        "Desktop entry created:".green(),
        def.desktop_file_normalized_name
    );
    Ok(Some(path))
}
