//! Core utilities and types for the Yobatis configuration generator.
//!
//! This crate provides the file tree abstraction the discovery engine runs
//! over, the Ant-style path matcher, token similarity scoring and the small
//! string helpers shared by the other crates.

mod ant;
mod diagnostic;
mod path;
mod placeholder;
mod similarity;
mod tree;

// Path matching
pub use ant::{AntPattern, ant_match};
// Run diagnostics
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
// Path utilities
pub use path::{
    concat_path, extract_package_name, file_name, package_to_path, parent_path, wipe_package_path,
};
// Placeholder utilities
pub use placeholder::{has_placeholder, placeholder_keys, substitute};
// Name similarity
pub use similarity::{TokenMatcher, highest_scoring};
// File tree
pub use tree::{File, FileTree, Folder, LocalTree, WriteResult};
