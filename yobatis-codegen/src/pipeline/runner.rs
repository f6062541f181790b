//! Pipeline orchestrator.

use tracing::debug;
use yobatis_core::FileTree;
use yobatis_project::{Result, Settings};

use super::{
    GenerationContext, Phase, PhaseInfo, Plugin,
    phases::{AnalyzePhase, ClassifyPhase, DiscoverPhase, MergePhase, RenderPhase},
};
use crate::table::TableSource;

/// The generation pipeline orchestrator.
///
/// The pipeline manages the execution of phases and plugin hooks. It runs
/// the built-in phases (discover, classify, render, merge, analyze) followed
/// by any user phases, calling plugin hooks before and after each phase.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new(StaticTables::new(tables))
///     .plugin(MyPlugin::new())
///     .phase(MyCustomPhase);
///
/// let ctx = pipeline.run(&tree, settings)?;
/// ```
pub struct Pipeline {
    builtin: Vec<Box<dyn Phase>>,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    /// Create a new pipeline whose classify phase asks `source` for tables.
    pub fn new(source: impl TableSource + 'static) -> Self {
        Self {
            builtin: vec![
                Box::new(DiscoverPhase),
                Box::new(ClassifyPhase::new(source)),
                Box::new(RenderPhase),
                Box::new(MergePhase),
                Box::new(AnalyzePhase),
            ],
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Every phase in execution order.
    pub fn phases(&self) -> Vec<PhaseInfo> {
        self.builtin
            .iter()
            .chain(self.phases.iter())
            .map(|phase| phase.info())
            .collect()
    }

    /// Run the pipeline on a project.
    ///
    /// Executes all phases in order:
    /// 1. DiscoverPhase - module tree, datasource, driver jar
    /// 2. ClassifyPhase - complete connection, tables, groups
    /// 3. RenderPhase - the document of this run
    /// 4. MergePhase - merged into the existing document
    /// 5. AnalyzePhase - generator elements checked
    /// 6. User phases (if any)
    ///
    /// Plugin hooks are called before and after each phase. Nothing is
    /// written; the merged document is left in the returned context.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase fails fatally.
    pub fn run<'t>(
        &self,
        tree: &'t dyn FileTree,
        settings: Settings,
    ) -> Result<GenerationContext<'t>> {
        let mut ctx = GenerationContext::new(tree, settings);

        for phase in self.builtin.iter().chain(self.phases.iter()) {
            self.run_phase(phase.as_ref(), &mut ctx)?;
        }

        Ok(ctx)
    }

    /// Run a single phase with plugin hooks.
    fn run_phase(&self, phase: &dyn Phase, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let phase_name = phase.name();

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        debug!(phase = phase_name, "running phase");
        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use tempfile::TempDir;
    use yobatis_core::LocalTree;

    use super::*;
    use crate::table::StaticTables;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut GenerationContext<'_>) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut GenerationContext<'_>) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_pipeline_lists_phases_in_order() {
        let pipeline = Pipeline::new(StaticTables::default());
        let names: Vec<_> = pipeline.phases().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["discover", "classify", "render", "merge", "analyze"]
        );
    }

    #[test]
    fn test_failed_phase_stops_hooks() {
        // An empty directory has no root pom, so discover fails.
        let dir = TempDir::new().unwrap();
        let tree = LocalTree::open(dir.path()).unwrap();
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let pipeline = Pipeline::new(StaticTables::default()).plugin(plugin);
        assert!(pipeline.run(&tree, Settings::default()).is_err());

        assert_eq!(before_count.load(Ordering::SeqCst), 1);
        assert_eq!(after_count.load(Ordering::SeqCst), 0);
    }
}
