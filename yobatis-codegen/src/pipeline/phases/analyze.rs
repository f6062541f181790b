//! Analyze phase - checks the merged document's generator elements.

use yobatis_project::Result;

use crate::{
    analyze::analyze,
    pipeline::{GenerationContext, Phase},
};

/// Phase that makes sure the generator can run on the merged document.
///
/// This phase must run after `MergePhase`. A live context with zero or
/// several model, mapper or client generators fails the run.
pub struct AnalyzePhase;

impl Phase for AnalyzePhase {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn description(&self) -> &'static str {
        "Check generator elements and compute target directories"
    }

    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let generators = analyze(&ctx.merged()?.document)?;
        ctx.generators = generators;
        Ok(())
    }
}
