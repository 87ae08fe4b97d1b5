//! Release files declared in the project description
//!
//! The `files` object maps an install destination to a source. A destination
//! may start with a platform marker (`WIN32:bin/tool.exe`) restricting the
//! entry to that platform. Sources starting with `http://` or `https://` are
//! downloaded at install time; anything else is a path under the project.

use std::fmt;
use std::path::Path;

/// Operating system a package is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Parse a platform name such as `windows` or `linux`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" | "mac" | "darwin" | "osx" => Platform::MacOs,
            _ => Platform::Other,
        }
    }

    fn is_unix(&self) -> bool {
        matches!(self, Platform::Linux | Platform::MacOs | Platform::Other)
    }
}

/// Platform restriction carried by a destination prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformGate {
    Windows,
    Unix,
    Linux,
    MacOs,
}

impl PlatformGate {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_uppercase().as_str() {
            "WIN32" | "WINDOWS" => Some(PlatformGate::Windows),
            "UNIX" => Some(PlatformGate::Unix),
            "LINUX" => Some(PlatformGate::Linux),
            "MACOS" | "MAC" => Some(PlatformGate::MacOs),
            _ => None,
        }
    }

    pub fn allows(&self, platform: Platform) -> bool {
        match self {
            PlatformGate::Windows => platform == Platform::Windows,
            PlatformGate::Unix => platform.is_unix(),
            PlatformGate::Linux => platform == Platform::Linux,
            PlatformGate::MacOs => platform == Platform::MacOs,
        }
    }
}

impl fmt::Display for PlatformGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformGate::Windows => "WIN32",
            PlatformGate::Unix => "UNIX",
            PlatformGate::Linux => "LINUX",
            PlatformGate::MacOs => "MACOS",
        };
        write!(f, "{}", name)
    }
}

/// What a release file source turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFileKind {
    LocalFile { executable: bool },
    LocalDirectory,
    Remote,
}

/// One entry of the `files` object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFileEntry {
    /// Base name of the destination, without extensions
    pub name: String,
    /// Install path with any platform marker removed
    pub destination: String,
    /// Local path relative to the project, or a URL
    pub source: String,
    pub platform_gate: Option<PlatformGate>,
}

impl ReleaseFileEntry {
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    /// Inspect the source on disk; local paths are relative to `base_path`
    pub fn kind(&self, base_path: &Path) -> ReleaseFileKind {
        if self.is_remote() {
            return ReleaseFileKind::Remote;
        }

        let path = base_path.join(&self.source);
        if path.is_dir() {
            ReleaseFileKind::LocalDirectory
        } else {
            ReleaseFileKind::LocalFile {
                executable: is_executable(&path),
            }
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}

/// Base name up to the first dot, like `libfoo` for `lib/libfoo.so.1`
fn base_name(destination: &str) -> String {
    let file_name = Path::new(destination)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

/// Turn declared `destination -> source` pairs into release entries.
///
/// Declaration order is kept. Entries gated to another platform than
/// `host` are dropped here and never reach the generators.
pub fn classify<I, K, V>(raw: I, host: Platform) -> Vec<ReleaseFileEntry>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|(key, source)| {
            let key = key.as_ref();
            let (gate, destination) = match key.split_once(':') {
                Some((prefix, rest)) => match PlatformGate::from_prefix(prefix) {
                    Some(gate) => (Some(gate), rest),
                    None => (None, key),
                },
                None => (None, key),
            };

            if let Some(gate) = gate {
                if !gate.allows(host) {
                    tracing::debug!(key, ?host, "skipping release file for other platform");
                    return None;
                }
            }

            Some(ReleaseFileEntry {
                name: base_name(destination),
                destination: destination.to_string(),
                source: source.as_ref().to_string(),
                platform_gate: gate,
            })
        })
        .collect()
}
