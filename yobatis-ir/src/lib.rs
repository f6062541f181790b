//! Generator configuration document model for Yobatis.
//!
//! A configuration document is parsed once into an immutable tree of tagged
//! variants (contexts, plugins, generators, tables and commented-out copies of
//! any of them), transformed functionally, and serialized once.
//!
//! # Architecture
//!
//! ```text
//! mybatisGeneratorConfig.xml → ConfigDocument::parse → merge → ConfigDocument::render
//! ```
//!
//! Commented elements are kept as [`Comment`] nodes that remember both their
//! verbatim text and the elements that text describes, so a disabled table
//! can be matched by name without ever becoming live again.

mod builder;
mod context;
mod document;
mod dtd;
mod element;
mod node;

pub use builder::{ToXml, XmlBuilder};
pub use context::{Context, ContextItem, TARGET_RUNTIME, tags};
pub use document::{ConfigDocument, ConfigItem, ParseError};
pub use dtd::{DTD, PUBLIC_ID, ROOT_ELEMENT, SYSTEM_ID, doctype, resolve_entity};
pub use element::{Child, Element};
pub use node::{Comment, Node};
