//! Project version resolution
//!
//! The `version` setting behaves like this:
//! - empty or absent: try git, fall back to the current date
//! - `git`: use the current tag, a describe string, or a shortened commit id
//! - `date`: use the current date
//! - anything else is taken verbatim

use crate::error::{PackagerError, Result};
use crate::runtime::runner::ProcessRunner;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::fmt;
use std::path::Path;

/// Length of the commit id used when no tag is reachable
const SHORT_COMMIT_LEN: usize = 8;

/// How the version is (or was) determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionKind {
    #[default]
    Auto,
    Forced,
    Git,
    Date,
}

impl fmt::Display for VersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionKind::Auto => "auto",
            VersionKind::Forced => "forced",
            VersionKind::Git => "git",
            VersionKind::Date => "date",
        };
        write!(f, "{}", name)
    }
}

/// The project version and how it was obtained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSpec {
    pub kind: VersionKind,
    pub forced_value: Option<String>,
    pub date_value: Option<String>,
    pub git_tag: Option<String>,
    pub git_describe: Option<String>,
    pub git_last_tag: Option<String>,
    pub git_commit_id: Option<String>,
    /// The version used everywhere else; empty until resolved
    pub resolved: String,
}

impl VersionSpec {
    /// Build an unresolved spec from the `version` setting.
    ///
    /// Keywords are matched ignoring surrounding whitespace; a forced value is
    /// kept exactly as written.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(|h| (h, h.trim())) {
            None | Some((_, "")) => Self::default(),
            Some((_, "git")) => Self {
                kind: VersionKind::Git,
                ..Self::default()
            },
            Some((_, "date")) => Self {
                kind: VersionKind::Date,
                ..Self::default()
            },
            Some((value, _)) => Self {
                kind: VersionKind::Forced,
                forced_value: Some(value.to_string()),
                ..Self::default()
            },
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.resolved.is_empty()
    }
}

/// What git could tell about the working tree
#[derive(Debug, Default)]
struct GitFacts {
    tag: Option<String>,
    describe: Option<String>,
    last_tag: Option<String>,
    commit_id: Option<String>,
}

impl GitFacts {
    /// Exact tag, then describe string, then the shortened commit id
    fn version(&self) -> Option<String> {
        self.tag
            .clone()
            .or_else(|| self.describe.clone())
            .or_else(|| {
                self.commit_id
                    .as_deref()
                    .map(|id| id.chars().take(SHORT_COMMIT_LEN).collect())
            })
    }
}

/// Resolves a [`VersionSpec`] using git and the clock
pub struct VersionResolver<'a, R: ProcessRunner> {
    runner: &'a R,
    today: NaiveDate,
}

impl<'a, R: ProcessRunner> VersionResolver<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            today: Local::now().date_naive(),
        }
    }

    /// Use a fixed date instead of the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Resolve `spec` in place of its `Auto`/`Git`/`Date` kind.
    ///
    /// Only an explicit `git` request can fail; `Auto` degrades to the date.
    pub fn resolve(&self, mut spec: VersionSpec, base_path: &Path) -> Result<VersionSpec> {
        match spec.kind {
            VersionKind::Forced => {
                spec.resolved = spec.forced_value.clone().unwrap_or_default();
                println!("Project version is user specified: {}", spec.resolved.green());
                return Ok(spec);
            }
            VersionKind::Date => {
                println!("Project version specified to use current date");
                self.apply_date(&mut spec);
            }
            VersionKind::Git => {
                println!("Project version specified to use git");
                let facts = self
                    .query_git(base_path)
                    .ok_or_else(|| PackagerError::VcsUnavailable {
                        path: base_path.to_path_buf(),
                    })?;
                let version = facts.version().ok_or_else(|| PackagerError::VcsQueryFailed {
                    path: base_path.to_path_buf(),
                })?;
                Self::apply_git(&mut spec, facts, version);
            }
            VersionKind::Auto => {
                println!("Trying to find project version");
                let facts = self.query_git(base_path);
                match facts.and_then(|f| f.version().map(|v| (f, v))) {
                    Some((facts, version)) => Self::apply_git(&mut spec, facts, version),
                    None => {
                        println!("Git failed, falling back to using current date");
                        self.apply_date(&mut spec);
                    }
                }
            }
        }

        println!("Project version is {}", spec.resolved.green());
        Ok(spec)
    }

    fn apply_date(&self, spec: &mut VersionSpec) {
        let date = self.today.format("%Y-%m-%d").to_string();
        spec.kind = VersionKind::Date;
        spec.date_value = Some(date.clone());
        spec.resolved = date;
    }

    fn apply_git(spec: &mut VersionSpec, facts: GitFacts, version: String) {
        spec.kind = VersionKind::Git;
        spec.git_tag = facts.tag;
        spec.git_describe = facts.describe;
        spec.git_last_tag = facts.last_tag;
        spec.git_commit_id = facts.commit_id;
        spec.resolved = version;
    }

    /// Run a git subcommand, returning trimmed non-empty stdout on success
    fn git(&self, base_path: &Path, args: &[&str]) -> Option<String> {
        let out = self.runner.run("git", base_path, args);
        out.trimmed()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// `None` when git cannot be used in `base_path` at all
    fn query_git(&self, base_path: &Path) -> Option<GitFacts> {
        if !self.runner.run("git", base_path, &["status"]).success {
            tracing::debug!(path = %base_path.display(), "git status failed");
            return None;
        }

        let branch = self
            .git(base_path, &["rev-parse", "--abbrev-ref", "HEAD"])
            .unwrap_or_else(|| "HEAD".to_string());

        let mut facts = GitFacts {
            tag: self.git(base_path, &["describe", "--tags", "--exact-match"]),
            ..GitFacts::default()
        };

        if facts.tag.is_none() {
            facts.describe = self.git(base_path, &["describe", "--tags"]);
            if facts.describe.is_some() {
                facts.last_tag = self.git(base_path, &["describe", "--tags", "--abbrev=0"]);
            }
        }

        facts.commit_id = self.git(base_path, &["rev-parse", "--verify", branch.as_str()]);
        tracing::debug!(?facts, branch = %branch, "git facts");
        Some(facts)
    }
}

/// Resolve the `version` setting for the project at `base_path`
pub fn resolve_version<R: ProcessRunner>(
    hint: Option<&str>,
    base_path: &Path,
    runner: &R,
) -> Result<VersionSpec> {
    VersionResolver::new(runner).resolve(VersionSpec::from_hint(hint), base_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::runner::RecordingRunner;

    const COMMIT: &str = "3f9a2c417be0d95e61c0a4b2d8e7f6a5b4c3d2e1";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn resolve(hint: Option<&str>, runner: &RecordingRunner) -> Result<VersionSpec> {
        VersionResolver::new(runner)
            .with_today(today())
            .resolve(VersionSpec::from_hint(hint), Path::new("/project"))
    }

    fn git_repo() -> RecordingRunner {
        RecordingRunner::new()
            .respond("git status", "On branch main")
            .respond("git rev-parse --abbrev-ref HEAD", "main\n")
            .respond("git rev-parse --verify main", &format!("{}\n", COMMIT))
    }

    #[test]
    fn test_from_hint() {
        assert_eq!(VersionSpec::from_hint(None).kind, VersionKind::Auto);
        assert_eq!(VersionSpec::from_hint(Some("")).kind, VersionKind::Auto);
        assert_eq!(VersionSpec::from_hint(Some("git")).kind, VersionKind::Git);
        assert_eq!(VersionSpec::from_hint(Some("date")).kind, VersionKind::Date);

        let forced = VersionSpec::from_hint(Some("1.2.3"));
        assert_eq!(forced.kind, VersionKind::Forced);
        assert_eq!(forced.forced_value.as_deref(), Some("1.2.3"));
        assert!(!forced.is_resolved());
    }

    #[test]
    fn test_forced_value_kept_verbatim() {
        assert_eq!(VersionSpec::from_hint(Some(" date ")).kind, VersionKind::Date);

        let runner = git_repo();
        let spec = resolve(Some(" 1.0 "), &runner).unwrap();
        assert_eq!(spec.kind, VersionKind::Forced);
        assert_eq!(spec.resolved, " 1.0 ");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_forced_version_skips_git() {
        for value in ["1.0", "v2.3.4-beta", "nightly"] {
            let runner = git_repo();
            let spec = resolve(Some(value), &runner).unwrap();
            assert_eq!(spec.kind, VersionKind::Forced);
            assert_eq!(spec.resolved, value);
            assert!(runner.calls().is_empty());
        }
    }

    #[test]
    fn test_date_version() {
        let runner = git_repo();
        let spec = resolve(Some("date"), &runner).unwrap();

        assert_eq!(spec.kind, VersionKind::Date);
        assert_eq!(spec.resolved, "2024-03-09");
        assert_eq!(spec.date_value.as_deref(), Some("2024-03-09"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_auto_without_git_uses_date() {
        let runner = RecordingRunner::new();
        let spec = resolve(None, &runner).unwrap();

        assert_eq!(spec.kind, VersionKind::Date);
        assert_eq!(spec.resolved, "2024-03-09");
        // Only the availability probe was attempted
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_auto_with_local_clock_is_iso_date() {
        let runner = RecordingRunner::new();
        let spec = resolve_version(None, Path::new("/project"), &runner).unwrap();

        assert_eq!(spec.resolved.len(), 10);
        assert!(NaiveDate::parse_from_str(&spec.resolved, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_explicit_git_unavailable_is_fatal() {
        let runner = RecordingRunner::new();
        let err = resolve(Some("git"), &runner).unwrap_err();
        assert!(matches!(err, PackagerError::VcsUnavailable { .. }));
    }

    #[test]
    fn test_explicit_git_without_any_answer_is_fatal() {
        let runner = RecordingRunner::new().respond("git status", "");
        let err = resolve(Some("git"), &runner).unwrap_err();
        assert!(matches!(err, PackagerError::VcsQueryFailed { .. }));
    }

    #[test]
    fn test_auto_with_empty_git_answers_uses_date() {
        let runner = RecordingRunner::new().respond("git status", "");
        let spec = resolve(None, &runner).unwrap();
        assert_eq!(spec.kind, VersionKind::Date);
    }

    #[test]
    fn test_exact_tag_wins_over_describe() {
        let runner = git_repo()
            .respond("git describe --tags --exact-match", "v1.4.0\n")
            .respond("git describe --tags", "v1.3.0-2-g3f9a2c4\n");
        let spec = resolve(Some("git"), &runner).unwrap();

        assert_eq!(spec.kind, VersionKind::Git);
        assert_eq!(spec.resolved, "v1.4.0");
        assert_eq!(spec.git_tag.as_deref(), Some("v1.4.0"));
        assert_eq!(spec.git_describe, None);
        assert_eq!(spec.git_commit_id.as_deref(), Some(COMMIT));
    }

    #[test]
    fn test_describe_when_not_on_tag() {
        let runner = git_repo()
            .respond("git describe --tags", "v1.3.0-2-g3f9a2c4\n")
            .respond("git describe --tags --abbrev=0", "v1.3.0\n");
        let spec = resolve(None, &runner).unwrap();

        assert_eq!(spec.kind, VersionKind::Git);
        assert_eq!(spec.resolved, "v1.3.0-2-g3f9a2c4");
        assert_eq!(spec.git_describe.as_deref(), Some("v1.3.0-2-g3f9a2c4"));
        assert_eq!(spec.git_last_tag.as_deref(), Some("v1.3.0"));
        assert_eq!(spec.git_tag, None);
    }

    #[test]
    fn test_commit_id_when_no_tag() {
        let runner = git_repo();
        let spec = resolve(Some("git"), &runner).unwrap();

        assert_eq!(spec.resolved, "3f9a2c41");
        assert_eq!(spec.resolved.len(), SHORT_COMMIT_LEN);
        assert_eq!(spec.git_commit_id.as_deref(), Some(COMMIT));
    }

    #[test]
    fn test_short_commit_id_kept_whole() {
        let runner = RecordingRunner::new()
            .respond("git status", "")
            .respond("git rev-parse --abbrev-ref HEAD", "main")
            .respond("git rev-parse --verify main", "abc12");
        let spec = resolve(Some("git"), &runner).unwrap();
        assert_eq!(spec.resolved, "abc12");
    }

    #[test]
    fn test_branch_probe_failure_falls_back_to_head() {
        let runner = RecordingRunner::new()
            .respond("git status", "")
            .respond("git rev-parse --verify HEAD", COMMIT);
        let spec = resolve(None, &runner).unwrap();

        assert_eq!(spec.resolved, "3f9a2c41");
        assert!(runner
            .calls()
            .iter()
            .any(|c| c.command_line() == "git rev-parse --verify HEAD"));
    }

    #[test]
    fn test_git_queries_run_in_base_path() {
        let runner = git_repo();
        resolve(None, &runner).unwrap();

        assert!(runner
            .calls()
            .iter()
            .all(|c| c.program == "git" && c.working_dir == Path::new("/project")));
    }
}
