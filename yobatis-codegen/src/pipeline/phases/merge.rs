//! Merge phase - folds the rendered document into the one on disk.

use yobatis_ir::ConfigDocument;
use yobatis_project::{Error, Result};

use crate::{
    merge::merge,
    pipeline::{GenerationContext, Phase},
};

/// Phase that reads the existing configuration document, if there is one,
/// and merges the rendered document into it.
///
/// An existing document that does not parse is fatal: overwriting it would
/// lose whatever the user put there.
pub struct MergePhase;

impl MergePhase {
    fn load_existing(ctx: &GenerationContext<'_>) -> Result<Option<ConfigDocument>> {
        let path = ctx.output_path();
        let Some(file) = ctx.tree.find_file(path) else {
            return Ok(None);
        };
        let text = ctx.tree.read(&file).map_err(|e| Error::io(path, e))?;
        ConfigDocument::parse(&text)
            .map(Some)
            .map_err(|e| Error::invalid_configuration(path, e.to_string()))
    }
}

impl Phase for MergePhase {
    fn name(&self) -> &'static str {
        "merge"
    }

    fn description(&self) -> &'static str {
        "Merge into the existing configuration, keeping manual edits"
    }

    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let existing = Self::load_existing(ctx)?;
        let generated = ctx
            .generated
            .as_ref()
            .ok_or_else(|| Error::phase_order("render"))?;
        let output = merge(existing.as_ref(), generated, &mut ctx.diagnostics);
        ctx.merged = Some(output);
        Ok(())
    }
}
