//! Built-in pipeline phases.
//!
//! This module provides the standard phases that run in every pipeline:
//!
//! - [`DiscoverPhase`] - builds the module tree and resolves the datasource
//! - [`ClassifyPhase`] - lists the tables and groups them by model package
//! - [`RenderPhase`] - renders the groups as a configuration document
//! - [`MergePhase`] - merges it into the document already on disk
//! - [`AnalyzePhase`] - checks the generator elements of the result

mod analyze;
mod classify;
mod discover;
mod merge;
mod render;

pub use analyze::AnalyzePhase;
pub use classify::ClassifyPhase;
pub use discover::DiscoverPhase;
pub use merge::MergePhase;
pub use render::RenderPhase;
