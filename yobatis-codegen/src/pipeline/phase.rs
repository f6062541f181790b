//! Pipeline phase trait.

use yobatis_project::Result;

use super::GenerationContext;

/// Information about a pipeline phase.
#[derive(Debug, Clone)]
pub struct PhaseInfo {
    /// The phase name.
    pub name: &'static str,
    /// A human-readable description.
    pub description: &'static str,
}

/// A phase in the generation pipeline.
///
/// Phases are executed in order by the pipeline. Each phase can read and
/// modify the generation context, filling in what later phases need and
/// adding diagnostics.
///
/// Built-in phases:
/// - `DiscoverPhase` - reads the module tree and the datasource settings
/// - `ClassifyPhase` - lists tables and groups them by model package
/// - `RenderPhase` - renders the groups as a configuration document
/// - `MergePhase` - merges that document into the one on disk
/// - `AnalyzePhase` - checks the merged document's generator elements
///
/// Custom phases can be added to the pipeline for additional processing.
pub trait Phase: Send + Sync {
    /// The name of this phase (used in diagnostics and plugin hooks).
    fn name(&self) -> &'static str;

    /// A human-readable description of what this phase does.
    fn description(&self) -> &'static str;

    /// Run this phase on the generation context.
    ///
    /// # Errors
    ///
    /// Returns an error if the phase fails fatally. Non-fatal issues should
    /// be recorded as diagnostics instead.
    fn run(&self, ctx: &mut GenerationContext<'_>) -> Result<()>;

    /// Get information about this phase.
    fn info(&self) -> PhaseInfo {
        PhaseInfo {
            name: self.name(),
            description: self.description(),
        }
    }
}
