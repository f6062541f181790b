//! Generate operation - the whole pipeline, then the document written or printed.

use std::path::Path;

use yobatis_codegen::{
    StaticTables,
    pipeline::{Pipeline, SnapshotPlugin},
};
use yobatis_core::{FileTree, Severity};
use yobatis_project::{Error, Result, Settings};

use super::{messages, open_project};
use crate::reports::{
    GenerateReport, GenerationResult, GroupSummary, PreviewResult, WrittenResult,
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Root of the maven project.
    pub project_dir: &'a Path,
    /// Settings, with the tables to generate for.
    pub settings: Settings,
    /// Whether to print the document instead of writing it.
    pub dry_run: bool,
    /// Where to write pipeline snapshots, if anywhere.
    pub snapshot_dir: Option<&'a Path>,
}

/// Execute the generate operation.
///
/// Runs the pipeline on the project and writes the merged document, unless
/// this is a dry run.
pub fn generate(opts: GenerateOptions) -> Result<GenerateReport> {
    let tree = open_project(opts.project_dir)?;

    let mut pipeline = Pipeline::new(StaticTables::from(opts.settings.tables.as_slice()));
    if let Some(dir) = opts.snapshot_dir {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(dir));
    }
    let ctx = pipeline.run(&tree, opts.settings)?;

    let modules = ctx
        .modules()?
        .modules()
        .iter()
        .map(|node| format!("{} ({})", node.artifact_id(), node.packaging()))
        .collect();
    let connection = ctx.connection()?;
    let merged = ctx.merged()?;
    let groups = ctx
        .groups
        .iter()
        .map(|group| GroupSummary {
            package: group.package.clone(),
            tables: group.tables.iter().map(|t| t.name.clone()).collect(),
        })
        .collect();

    let output_path = ctx.output_path();
    let content = merged.document.render();
    let result = if opts.dry_run {
        GenerationResult::Preview(PreviewResult {
            path: output_path.to_string(),
            content,
        })
    } else {
        let write = tree
            .save(output_path, &content)
            .map_err(|e| Error::io(tree.absolute(output_path), e))?;
        GenerationResult::Written(WrittenResult {
            path: tree.absolute(output_path),
            write,
            snapshot_dir: opts.snapshot_dir.map(Path::to_path_buf),
        })
    };

    Ok(GenerateReport {
        warnings: messages(&ctx.diagnostics, Severity::Warning),
        infos: messages(&ctx.diagnostics, Severity::Info),
        modules,
        url: connection.url.clone(),
        username: connection.username.clone(),
        groups,
        contexts: merged.contexts.clone(),
        generators: ctx.generators.clone(),
        result,
    })
}
