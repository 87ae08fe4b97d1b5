//! External program execution and toolchain detection
//!
//! This module provides:
//! - A narrow process-running capability with a real and a recording implementation
//! - Qt version detection through qmake

pub mod check;
pub mod runner;

pub use check::{detect_qt_version, find_qt_modules, QtMajorVersion, QtVersionHint};
pub use runner::{ProcessRunner, RecordedCall, RecordingRunner, RunOutput, SystemRunner};
