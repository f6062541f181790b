//! MyBatis generator configuration for Yobatis.
//!
//! Turns what project discovery found into a generator configuration
//! document, and folds it into the document already on disk.
//!
//! # Module Organization
//!
//! - [`table`] - Table metadata and the [`TableSource`] seam
//! - [`classifier`] - Assigning tables to model packages
//! - [`render`] - Rendering contexts and the whole document
//! - [`merge`] - Merging into an existing, hand-edited document
//! - [`analyze`] - Checking generator elements before the generator runs
//! - [`pipeline`] - Phases, plugins and the run context

pub mod analyze;
pub mod classifier;
pub mod merge;
pub mod pipeline;
pub mod render;
pub mod table;

pub use analyze::{GeneratorDirs, analyze};
pub use classifier::{TableClassifier, TableGroup};
pub use merge::{ContextOutcome, ContextReport, MergeOutput, merge};
pub use render::{
    ContextModel, DAO_PLUGIN, GeneratorConfigModel, MAPPER_PACKAGE, RENAME_EXAMPLE_PLUGIN,
};
pub use table::{StaticTables, Table, TableSource};
