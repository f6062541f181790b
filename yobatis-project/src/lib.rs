//! Project discovery for Yobatis.
//!
//! Reads a maven project by static inspection: the module tree and its
//! placeholder chain, the web module's deployment descriptor, and the spring
//! bean definitions and properties files that declare the datasource.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod datasource;
mod error;
mod locator;
mod module_tree;
mod pom;
mod properties;
mod settings;
mod spring;
mod web_xml;
mod xml;

pub use datasource::{ConnectionSettings, DatabaseSettings, DatasourceResolver};
pub use error::{Error, FieldProblem, Result};
pub use locator::{ConfigFileLocator, HintKind, Located};
pub use module_tree::{ModuleId, ModuleNode, ModuleTree};
pub use pom::{Dependency, POM_FILE, Packaging, Pom};
pub use properties::parse_properties;
pub use settings::{
    DEFAULT_OUTPUT_FILE, OutputSettings, ProjectSettings, SETTINGS_FILE, Settings, SettingsFile,
    TEMPLATE, TableSpec,
};
pub use spring::{BeanDefinitions, DATASOURCE_CLASSES, DatasourceProperties};
pub use web_xml::{DeploymentDescriptor, WEB_XML};
