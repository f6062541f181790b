//! Pipeline snapshot plugin for debugging.
//!
//! This module provides a plugin that captures the document after the
//! render and merge phases, so the two can be compared side by side.

use std::{fs, path::PathBuf, sync::RwLock};

use yobatis_ir::ConfigDocument;
use yobatis_project::{Error, Result};

use super::{GenerationContext, Plugin};

/// A snapshot of the pipeline state at a specific phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSnapshot {
    /// The phase that just completed.
    pub phase: String,
    /// The rendered document after "render", the merged one after "merge".
    pub document: Option<String>,
    /// Diagnostics collected so far.
    pub diagnostics: usize,
}

/// A plugin that captures pipeline state after each phase.
///
/// With an output directory, every captured document is also written to
/// `<dir>/<phase>.xml` as soon as its phase completes.
pub struct SnapshotPlugin {
    snapshots: RwLock<Vec<PhaseSnapshot>>,
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    /// Create a new snapshot plugin.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: None,
        }
    }

    /// Create a new snapshot plugin that writes to a directory.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: RwLock::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// Get all collected snapshots.
    pub fn snapshots(&self) -> Vec<PhaseSnapshot> {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.clone())
            .unwrap_or_default()
    }

    fn capture(phase: &str, ctx: &GenerationContext<'_>) -> PhaseSnapshot {
        let document = match phase {
            "render" => ctx.generated.as_ref().map(ConfigDocument::render),
            "merge" => ctx.merged.as_ref().map(|m| m.document.render()),
            _ => None,
        };
        PhaseSnapshot {
            phase: phase.to_string(),
            document,
            diagnostics: ctx.diagnostics.len(),
        }
    }
}

impl Default for SnapshotPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_phase(&self, phase: &str, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let snapshot = Self::capture(phase, ctx);

        if let (Some(dir), Some(document)) = (&self.output_dir, &snapshot.document) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
            let path = dir.join(format!("{}.xml", phase));
            fs::write(&path, document).map_err(|e| Error::io(&path, e))?;
        }

        if let Ok(mut snapshots) = self.snapshots.write() {
            snapshots.push(snapshot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use yobatis_core::LocalTree;
    use yobatis_project::Settings;

    use super::*;

    #[test]
    fn test_snapshot_plugin_creation() {
        let plugin = SnapshotPlugin::new();
        assert!(plugin.snapshots().is_empty());
    }

    #[test]
    fn test_writes_rendered_document() {
        let project = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let tree = LocalTree::open(project.path()).unwrap();
        let mut ctx = GenerationContext::new(&tree, Settings::default());
        ctx.generated = Some(ConfigDocument::default());

        let plugin = SnapshotPlugin::with_output_dir(out.path().join("snapshots"));
        plugin.on_after_phase("discover", &mut ctx).unwrap();
        plugin.on_after_phase("render", &mut ctx).unwrap();

        let snapshots = plugin.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].document, None);
        let written = fs::read_to_string(out.path().join("snapshots/render.xml")).unwrap();
        assert_eq!(Some(written), snapshots[1].document);
        assert!(!out.path().join("snapshots/discover.xml").exists());
    }
}
