//! sqpackager CLI - packaging files for Qt projects

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sqpackager_core::{
    Packager, ProjectDefinition, ReleaseFileEntry, ResolvedProject, SystemRunner, TemplateSource,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sqpackager")]
#[command(about = "Generate installer scripts, man pages and desktop entries for Qt projects")]
#[command(version)]
pub struct Args {
    /// Project description file (defaults to sqproject.json in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Local directory to read templates from instead of the built-in ones (for development use)
    #[arg(long = "template-dir", global = true)]
    pub template_dir: Option<PathBuf>,

    /// Project version, overriding the "version" field (a value, "git" or "date")
    #[arg(long = "project-version", global = true)]
    pub project_version: Option<String>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the installer script, man page and desktop entry
    Generate,
    /// Generate the Unix installer script
    Installer,
    /// Generate the man page
    Manpage,
    /// Generate the desktop entry
    Desktop,
    /// Create a versioned source archive
    Archive(ArchiveArgs),
    /// Print the resolved project metadata
    Info,
}

#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    /// Version used in the archive name instead of the resolved one
    #[arg(long = "archive-version")]
    pub archive_version: Option<String>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn print_info(project: &ResolvedProject) {
    let def = &project.definition;
    println!();
    println!("{}", def.name.cyan().bold());
    println!("  {:<14} {} ({})", "Version:", project.version(), project.version.kind);
    if let Some(describe) = &project.version.git_describe {
        println!("  {:<14} {}", "Describe:", describe);
    }
    if let Some(tag) = &project.version.git_last_tag {
        println!("  {:<14} {}", "Last tag:", tag);
    }
    println!("  {:<14} {}", "Target:", def.target_name);
    println!("  {:<14} {}", "License file:", project.license.file_name);
    if project.license.is_identified() {
        println!("  {:<14} {}", "License:", project.license.license_name);
    }
    if let Some(readme) = &project.readme {
        println!("  {:<14} {}", "Readme:", readme);
    }
    println!("  {:<14} {}", "Qt:", project.qt_version);
    for file in &def.release_files {
        println!("  {:<14} {}", "File:", release_file_line(file));
    }
}

fn release_file_line(file: &ReleaseFileEntry) -> String {
    match file.platform_gate {
        Some(gate) => format!("{} -> {} [{}]", file.source, file.destination, gate),
        None => format!("{} -> {}", file.source, file.destination),
    }
}

fn run(args: Args) -> Result<()> {
    let mut definition = ProjectDefinition::load(args.config.as_deref())?;
    if let Some(version) = args.project_version {
        definition.version = Some(version);
    }

    let packager = Packager::new(SystemRunner, TemplateSource::from_dir(args.template_dir));
    let project = packager.resolve(definition)?;

    match args.command.unwrap_or(Command::Generate) {
        Command::Generate => {
            packager.generate_all(&project)?;
        }
        Command::Installer => {
            packager.installer(&project)?;
        }
        Command::Manpage => {
            packager.manpage(&project)?;
        }
        Command::Desktop => {
            packager.desktop_entry(&project)?;
        }
        Command::Archive(archive_args) => {
            packager
                .archive(&project, archive_args.archive_version.as_deref())
                .context("Archive creation failed")?;
        }
        Command::Info => print_info(&project),
    }

    Ok(())
}

fn main() {
    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        std::process::exit(130);
    })
    .ok();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
