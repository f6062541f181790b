//! Generation context passed through pipeline phases.

use yobatis_core::{Diagnostics, FileTree};
use yobatis_ir::ConfigDocument;
use yobatis_project::{
    ConnectionSettings, DatabaseSettings, Error, ModuleTree, Result, Settings,
};

use crate::{analyze::GeneratorDirs, classifier::TableGroup, merge::MergeOutput};

/// Context passed through all pipeline phases.
///
/// This struct carries the state of a run through each phase, accumulating
/// results and diagnostics along the way. Phases fill the `Option` fields in
/// order; the accessors fail with [`Error::PhaseOrder`] when a phase reads
/// something its predecessor has not produced.
pub struct GenerationContext<'t> {
    /// The project being inspected.
    pub tree: &'t dyn FileTree,
    /// Settings from `yobatis.toml`.
    pub settings: Settings,
    /// The module tree (populated by DiscoverPhase).
    pub modules: Option<ModuleTree<'t>>,
    /// Connection fields as discovered, possibly incomplete (DiscoverPhase).
    pub database: Option<DatabaseSettings>,
    /// Location of the JDBC driver jar, if found (DiscoverPhase).
    pub class_path_entry: Option<String>,
    /// Complete connection settings (ClassifyPhase).
    pub connection: Option<ConnectionSettings>,
    /// Tables grouped by model package (ClassifyPhase).
    pub groups: Vec<TableGroup>,
    /// The document rendered from this run alone (RenderPhase).
    pub generated: Option<ConfigDocument>,
    /// The rendered document merged into the existing one (MergePhase).
    pub merged: Option<MergeOutput>,
    /// Target directories per live context (AnalyzePhase).
    pub generators: Vec<GeneratorDirs>,
    /// Diagnostics collected during the run.
    pub diagnostics: Diagnostics,
}

impl<'t> GenerationContext<'t> {
    pub fn new(tree: &'t dyn FileTree, settings: Settings) -> Self {
        Self {
            tree,
            settings,
            modules: None,
            database: None,
            class_path_entry: None,
            connection: None,
            groups: Vec::new(),
            generated: None,
            merged: None,
            generators: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn modules(&self) -> Result<&ModuleTree<'t>> {
        self.modules.as_ref().ok_or_else(|| Error::phase_order("discover"))
    }

    pub fn database(&self) -> Result<&DatabaseSettings> {
        self.database.as_ref().ok_or_else(|| Error::phase_order("discover"))
    }

    pub fn connection(&self) -> Result<&ConnectionSettings> {
        self.connection.as_ref().ok_or_else(|| Error::phase_order("classify"))
    }

    pub fn generated(&self) -> Result<&ConfigDocument> {
        self.generated.as_ref().ok_or_else(|| Error::phase_order("render"))
    }

    pub fn merged(&self) -> Result<&MergeOutput> {
        self.merged.as_ref().ok_or_else(|| Error::phase_order("merge"))
    }

    /// Relative path of the configuration document.
    pub fn output_path(&self) -> &str {
        self.settings.output.file.trim_start_matches('/')
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Count the number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.warning_count()
    }
}

impl std::fmt::Debug for GenerationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationContext")
            .field("settings", &self.settings)
            .field("modules", &self.modules)
            .field("database", &self.database)
            .field("class_path_entry", &self.class_path_entry)
            .field("groups", &self.groups)
            .field("merged", &self.merged)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use yobatis_core::LocalTree;

    use super::*;

    #[test]
    fn test_context_creation() {
        let dir = TempDir::new().unwrap();
        let tree = LocalTree::open(dir.path()).unwrap();
        let ctx = GenerationContext::new(&tree, Settings::default());

        assert!(ctx.modules.is_none());
        assert!(ctx.groups.is_empty());
        assert!(ctx.diagnostics.is_empty());
        assert_eq!(ctx.output_path(), "mybatisGeneratorConfig.xml");
    }

    #[test]
    fn test_accessors_name_the_missing_phase() {
        let dir = TempDir::new().unwrap();
        let tree = LocalTree::open(dir.path()).unwrap();
        let ctx = GenerationContext::new(&tree, Settings::default());

        let err = ctx.connection().unwrap_err();
        assert!(matches!(*err, Error::PhaseOrder { requires: "classify" }));
        assert!(ctx.modules().is_err());
        assert!(ctx.merged().is_err());
    }

    #[test]
    fn test_context_diagnostics() {
        let dir = TempDir::new().unwrap();
        let tree = LocalTree::open(dir.path()).unwrap();
        let mut ctx = GenerationContext::new(&tree, Settings::default());

        ctx.diagnostics.error("test", "test error");
        ctx.diagnostics.warning("test", "test warning");

        assert!(ctx.has_errors());
        assert_eq!(ctx.warning_count(), 1);
    }
}
