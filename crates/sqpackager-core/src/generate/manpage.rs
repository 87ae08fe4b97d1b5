//! Man page generation

use super::{write_output, ResolvedProject};
use crate::error::Result;
use crate::templates::{Resource, TemplateMapping, TemplateSource};
use chrono::NaiveDate;
use colored::Colorize;
use std::path::PathBuf;

/// Values for the man page template; `today` fills the page date
pub fn manpage_mapping(project: &ResolvedProject, today: NaiveDate) -> TemplateMapping {
    let def = &project.definition;
    let mut mapping: TemplateMapping = [
        ("TARGET_NAME", def.target_name.as_str()),
        ("SHORT_DESCRIPTION", def.short_description.as_str()),
        ("LONG_DESCRIPTION", def.description.as_str()),
        ("AUTHOR", def.author.as_str()),
        ("AUTHOR_MAIL", def.author_mail.as_str()),
        ("VERSION", project.version()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    mapping.insert("DATE".to_string(), today.format("%d %b %Y").to_string());
    if !def.author.is_empty() {
        mapping.insert("HAS_AUTHOR".to_string(), String::new());
    }
    mapping
}

/// Render and write `<target>.manpage.1`, returning its path
pub fn generate_manpage(
    project: &ResolvedProject,
    templates: &TemplateSource,
    today: NaiveDate,
) -> Result<PathBuf> {
    println!("{}", "Creating manpage".cyan());

    let file_name = format!("{}.manpage.1", project.definition.target_name);
    let mapping = manpage_mapping(project, today);
    let content = templates.render(Resource::ManPage, &mapping)?;
    let path = project.definition.base_path.join(&file_name);
    write_output(&path, &content)?;

    println!("  {} {}", "Manpage created:".green(), file_name);
    Ok(path)
}
