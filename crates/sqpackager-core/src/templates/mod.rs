//! Template loading and rendering
//!
//! This module provides:
//! - The line-oriented template engine (variables and IF blocks)
//! - Template resources, embedded or read from a local directory

pub mod engine;
pub mod resources;

pub use engine::{render, TemplateMapping};
pub use resources::{Resource, TemplateSource};
