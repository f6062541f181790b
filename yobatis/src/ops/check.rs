//! Check operation - discovery only.

use std::path::Path;

use yobatis_codegen::pipeline::{GenerationContext, Phase, phases::DiscoverPhase};
use yobatis_core::{Severity, has_placeholder};
use yobatis_project::{Result, Settings};

use super::{messages, open_project};
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs the discover phase and reports the connection fields it resolved.
/// An incomplete connection is reported, not returned as an error.
pub fn check(project_dir: &Path, settings: Settings) -> Result<CheckReport> {
    let tree = open_project(project_dir)?;
    let mut ctx = GenerationContext::new(&tree, settings);
    DiscoverPhase.run(&mut ctx)?;

    let database = ctx.database()?;
    let completed = database.ensure_complete();
    let password = match (&database.password, &completed) {
        (_, Ok(connection)) => Some(connection.masked_password()),
        (Some(raw), Err(_)) if has_placeholder(raw) => Some(raw.clone()),
        (Some(_), Err(_)) => Some("********".to_string()),
        (None, _) => None,
    };

    Ok(CheckReport {
        project_dir: project_dir.to_path_buf(),
        errors: messages(&ctx.diagnostics, Severity::Error),
        warnings: messages(&ctx.diagnostics, Severity::Warning),
        infos: messages(&ctx.diagnostics, Severity::Info),
        fields: vec![
            ("url", database.url.clone()),
            ("username", database.username.clone()),
            ("password", password),
            ("driverClassName", database.driver_class_name.clone()),
        ],
        class_path_entry: ctx.class_path_entry.clone(),
        problem: completed.err(),
    })
}
