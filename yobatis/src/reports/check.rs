//! Check command report data structures.

use std::path::PathBuf;

use yobatis_core::Severity;
use yobatis_project::Error;

use super::output::{Output, Report};

/// Report data from datasource discovery.
#[derive(Debug)]
pub struct CheckReport {
    /// Root of the checked project.
    pub project_dir: PathBuf,
    /// Error messages.
    pub errors: Vec<String>,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Info messages.
    pub infos: Vec<String>,
    /// Connection fields in display order; the password is masked once resolved.
    pub fields: Vec<(&'static str, Option<String>)>,
    /// Location of the driver jar, if found.
    pub class_path_entry: Option<String>,
    /// Why the connection cannot be used, if it cannot.
    pub problem: Option<Box<Error>>,
}

impl CheckReport {
    /// Whether the check passed: no errors and a complete connection.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.problem.is_none()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.diagnostic(Severity::Error, error);
        }
        for warning in &self.warnings {
            out.diagnostic(Severity::Warning, warning);
        }
        for info in &self.infos {
            out.diagnostic(Severity::Info, info);
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        out.section("Datasource");
        for (name, value) in &self.fields {
            out.field(0, name, value.as_deref().unwrap_or("(missing)"));
        }
        out.field(
            0,
            "classPathEntry",
            self.class_path_entry.as_deref().unwrap_or("(not found)"),
        );
        out.newline();

        if self.is_valid() {
            out.note(&format!(
                "✓ datasource of {} is complete",
                self.project_dir.display()
            ));
        }
    }
}
