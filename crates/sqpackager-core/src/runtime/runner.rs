//! Synchronous execution of external programs
//!
//! Everything that shells out (git queries, qmake probes, tar) goes through
//! [`ProcessRunner`], so tests can swap in a [`RecordingRunner`] and never
//! touch the real tools.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Outcome of running an external program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// True when the program started and exited with status zero
    pub success: bool,
    /// Captured standard output, untrimmed
    pub stdout: String,
}

impl RunOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    /// Stdout with surrounding whitespace removed, or `None` on failure
    pub fn trimmed(&self) -> Option<&str> {
        self.success.then(|| self.stdout.trim())
    }
}

/// Capability to run a named executable and capture its stdout.
///
/// Blocks until the program exits. A non-zero exit status is the only
/// failure signal; stderr is not captured.
pub trait ProcessRunner {
    fn run(&self, program: &str, working_dir: &Path, args: &[&str]) -> RunOutput;
}

/// Runs programs through `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, working_dir: &Path, args: &[&str]) -> RunOutput {
        tracing::debug!(program, ?args, dir = %working_dir.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(out) => {
                let result = RunOutput {
                    success: out.status.success(),
                    stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                };
                tracing::debug!(program, success = result.success, "finished");
                result
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "could not start");
                RunOutput::failed()
            }
        }
    }
}

/// A call observed by [`RecordingRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub working_dir: PathBuf,
    pub args: Vec<String>,
}

impl RecordedCall {
    /// Program and arguments joined with spaces, e.g. `git describe --tags`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Scripted runner for tests and dry runs.
///
/// Responses are keyed by the full command line (`program arg1 arg2`).
/// Unscripted commands fail, which mimics a missing executable.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: HashMap<String, RunOutput>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for a command line
    pub fn respond(mut self, command_line: &str, stdout: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), RunOutput::ok(stdout));
        self
    }

    /// Script a failing response for a command line
    pub fn fail(mut self, command_line: &str) -> Self {
        self.responses
            .insert(command_line.to_string(), RunOutput::failed());
        self
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// True if any recorded call ran `program`
    pub fn invoked(&self, program: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.program == program)
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &str, working_dir: &Path, args: &[&str]) -> RunOutput {
        let call = RecordedCall {
            program: program.to_string(),
            working_dir: working_dir.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        let response = self
            .responses
            .get(&call.command_line())
            .cloned()
            .unwrap_or_default();
        self.calls.borrow_mut().push(call);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_returns_scripted_output() {
        let runner = RecordingRunner::new().respond("git status", "On branch main\n");
        let out = runner.run("git", Path::new("."), &["status"]);

        assert!(out.success);
        assert_eq!(out.trimmed(), Some("On branch main"));
    }

    #[test]
    fn test_recording_runner_unscripted_fails() {
        let runner = RecordingRunner::new();
        let out = runner.run("git", Path::new("."), &["status"]);

        assert!(!out.success);
        assert_eq!(out.trimmed(), None);
    }

    #[test]
    fn test_recording_runner_records_calls_in_order() {
        let runner = RecordingRunner::new().fail("git status");
        runner.run("git", Path::new("/repo"), &["status"]);
        runner.run("tar", Path::new("/repo"), &["-zcf", "a.tar.gz", "."]);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].command_line(), "git status");
        assert_eq!(calls[1].working_dir, PathBuf::from("/repo"));
        assert!(runner.invoked("tar"));
        assert!(!runner.invoked("qmake"));
    }

    #[test]
    fn test_system_runner_missing_program_is_failure() {
        let out = SystemRunner.run(
            "sqpackager-definitely-not-a-real-program",
            Path::new("."),
            &[],
        );
        assert!(!out.success);
        assert!(out.stdout.is_empty());
    }
}
