//! Generate command report data structures.

use std::path::PathBuf;

use yobatis_codegen::{ContextOutcome, ContextReport, GeneratorDirs};
use yobatis_core::{Severity, WriteResult};

use super::output::{Mark, Output, Report};

/// Report data from a generate run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,
    /// Info messages from the pipeline.
    pub infos: Vec<String>,
    /// Modules, as `artifact (packaging)`.
    pub modules: Vec<String>,
    /// Datasource URL.
    pub url: String,
    /// Datasource user.
    pub username: String,
    /// Tables per model package.
    pub groups: Vec<GroupSummary>,
    /// What the merge did to each context.
    pub contexts: Vec<ContextReport>,
    /// Where each live context's code will be generated.
    pub generators: Vec<GeneratorDirs>,
    /// Document written or previewed.
    pub result: GenerationResult,
}

/// Tables assigned to one model package.
#[derive(Debug)]
pub struct GroupSummary {
    pub package: String,
    pub tables: Vec<String>,
}

/// What happened to the document.
#[derive(Debug)]
pub enum GenerationResult {
    /// The document was saved.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when the document was saved.
#[derive(Debug)]
pub struct WrittenResult {
    /// Absolute path of the document.
    pub path: PathBuf,
    /// Created, updated or unchanged.
    pub write: WriteResult,
    /// Path to pipeline snapshots, if they were requested.
    pub snapshot_dir: Option<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Path the document would be written to, relative to the project.
    pub path: String,
    /// The merged document.
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_diagnostics(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.diagnostic(Severity::Warning, warning);
        }
        for info in &self.infos {
            out.diagnostic(Severity::Info, info);
        }
    }

    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(dir) = &written.snapshot_dir {
            out.status("Pipeline snapshots written to", &dir.display().to_string());
            out.newline();
        }

        self.render_diagnostics(out);

        out.section(&format!("Modules ({})", self.modules.len()));
        for module in &self.modules {
            out.item(Mark::Plain, module);
        }
        out.newline();

        out.section("Datasource");
        out.field(0, "url", &self.url);
        out.field(0, "user", &self.username);
        out.newline();

        let table_count: usize = self.groups.iter().map(|g| g.tables.len()).sum();
        out.section(&format!("Tables ({})", table_count));
        for group in &self.groups {
            out.field(0, &group.package, &group.tables.join(", "));
        }
        out.newline();

        out.section("Contexts");
        for ctx in &self.contexts {
            render_context(out, ctx);
        }
        out.newline();

        if !self.generators.is_empty() {
            out.section("Generator targets");
            for dirs in &self.generators {
                out.item(Mark::Plain, &dirs.context);
                out.field(1, "model", &dirs.model_dir);
                out.field(1, "criteria", &dirs.criteria_dir);
                out.field(1, "dao", &dirs.dao_dir);
                out.field(1, "mappers", &dirs.xml_mapper_dir);
            }
            out.newline();
        }

        let outcome = match written.write {
            WriteResult::Created => "Created",
            WriteResult::Updated => "Updated",
            WriteResult::Unchanged => "Unchanged",
        };
        out.status(outcome, &written.path.display().to_string());
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        self.render_diagnostics(out);

        out.document(&preview.path, &preview.content);
        out.newline();

        let live = self
            .contexts
            .iter()
            .filter(|c| c.outcome != ContextOutcome::Commented)
            .count();
        out.note(&format!(
            "{} contexts ({} live) would be written",
            self.contexts.len(),
            live
        ));
    }
}

fn render_context(out: &mut dyn Output, ctx: &ContextReport) {
    match ctx.outcome {
        ContextOutcome::Commented => out.item(Mark::Commented, &format!("{} (commented)", ctx.id)),
        outcome if ctx.added_tables.is_empty() => out.item(
            Mark::Plain,
            &format!("{} ({}, {} live tables)", ctx.id, outcome, ctx.live_tables),
        ),
        outcome => out.item(
            Mark::Added,
            &format!("{} ({}): {}", ctx.id, outcome, ctx.added_tables.join(", ")),
        ),
    }
}
