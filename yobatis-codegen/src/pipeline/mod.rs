//! Generation pipeline.
//!
//! This module provides a [`Pipeline`] orchestrator that runs a project
//! through discovery, classification, rendering, merging and analysis. The
//! pipeline provides:
//!
//! - Explicit phase boundaries (discover → classify → render → merge → analyze)
//! - Plugin hooks for extensibility (before/after each phase)
//! - One diagnostics collector per run
//! - Shared state via [`GenerationContext`]
//!
//! # Example
//!
//! ```ignore
//! use yobatis_codegen::{StaticTables, pipeline::Pipeline};
//!
//! let pipeline = Pipeline::new(StaticTables::from(settings.tables.as_slice()));
//! let ctx = pipeline.run(&tree, settings)?;
//!
//! for diag in ctx.diagnostics.warnings() {
//!     eprintln!("warning: {}", diag.message);
//! }
//!
//! let merged = ctx.merged()?;
//! tree.save(ctx.output_path(), &merged.document.render())?;
//! ```

mod context;
mod phase;
pub mod phases;
mod plugin;
mod runner;
mod snapshot;

pub use context::GenerationContext;
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use snapshot::{PhaseSnapshot, SnapshotPlugin};
