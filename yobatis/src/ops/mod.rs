//! Core operations.
//!
//! This module contains the business logic for yobatis commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod info;

use std::path::Path;

pub use check::check;
pub use generate::{GenerateOptions, generate};
pub use info::info;
use yobatis_core::{Diagnostic, Diagnostics, LocalTree, Severity};
use yobatis_project::{Error, Result};

/// Open a project directory as a file tree.
fn open_project(dir: &Path) -> Result<LocalTree> {
    LocalTree::open(dir).map_err(|e| Error::io(dir, e))
}

/// A diagnostic as one message, with its location on a second line.
fn describe(diag: &Diagnostic) -> String {
    match &diag.location {
        Some(loc) => format!("{}\n  --> {}", diag.message, loc),
        None => diag.message.clone(),
    }
}

/// Messages of one severity.
fn messages(diagnostics: &Diagnostics, severity: Severity) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .map(describe)
        .collect()
}
