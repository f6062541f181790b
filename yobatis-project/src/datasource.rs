//! Following spring's import graph to the datasource connection settings.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;
use yobatis_core::{
    Diagnostic, Diagnostics, File, FileTree, has_placeholder, parent_path, substitute,
};

use crate::{
    Error, FieldProblem, Result,
    locator::{ConfigFileLocator, HintKind, Located},
    module_tree::ModuleId,
    properties::parse_properties,
    spring::{BeanDefinitions, DatasourceProperties},
};

const PHASE: &str = "discover";

/// Connection fields after placeholder substitution. Any may be missing,
/// and any may still hold a placeholder nothing resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub driver_class_name: Option<String>,
}

impl DatabaseSettings {
    fn fields(&self) -> [(&'static str, &Option<String>); 4] {
        [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
            ("driverClassName", &self.driver_class_name),
        ]
    }

    /// The first field that cannot be used, with the reason.
    pub fn problem(&self) -> Option<(&'static str, FieldProblem)> {
        self.fields().into_iter().find_map(|(name, value)| match value {
            None => Some((name, FieldProblem::Missing)),
            Some(v) if has_placeholder(v) => Some((name, FieldProblem::Unresolved(v.clone()))),
            Some(_) => None,
        })
    }

    /// Require every field to be present and free of placeholders.
    pub fn ensure_complete(&self) -> Result<ConnectionSettings> {
        if let Some((field, problem)) = self.problem() {
            return Err(Error::sql_config_incomplete(field, problem));
        }
        let take = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok(ConnectionSettings {
            username: take(&self.username),
            password: take(&self.password),
            url: take(&self.url),
            driver_class_name: take(&self.driver_class_name),
        })
    }
}

/// Complete connection settings, ready to hand to a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub username: String,
    pub password: String,
    pub url: String,
    pub driver_class_name: String,
}

impl ConnectionSettings {
    /// The database named by the URL path (`jdbc:mysql://host:3306/demo?x=y` gives `demo`).
    pub fn database_name(&self) -> Option<&str> {
        let (_, rest) = self.url.split_once("://")?;
        let (_, path) = rest.split_once('/')?;
        let name = path.split(['?', ';', '/']).next()?;
        (!name.is_empty()).then_some(name)
    }

    /// The password with every character but the first and last masked.
    pub fn masked_password(&self) -> String {
        let count = self.password.chars().count();
        if count <= 2 {
            return "*".repeat(count);
        }
        self.password
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 || i == count - 1 { c } else { '*' })
            .collect()
    }
}

/// Walks bean definition files from the deployment descriptor's hints.
pub struct DatasourceResolver<'l, 'm, 't> {
    locator: &'l ConfigFileLocator<'m, 't>,
}

/// Per-run traversal state. The visited sets keep cyclic imports finite.
#[derive(Default)]
struct Traversal {
    visited_xml: HashSet<File>,
    visited_properties: HashSet<File>,
    declared: DatasourceProperties,
    properties: IndexMap<String, String>,
}

impl<'l, 'm, 't> DatasourceResolver<'l, 'm, 't> {
    pub fn new(locator: &'l ConfigFileLocator<'m, 't>) -> Self {
        Self { locator }
    }

    /// Resolve the connection settings reachable from the entry hints.
    ///
    /// The first declaration of each field wins. Properties files are loaded
    /// as they are reached, later files overriding earlier keys. Declared
    /// values are then substituted against those properties exactly once.
    pub fn resolve(
        &self,
        entry_hints: &[String],
        start: ModuleId,
        diagnostics: &mut Diagnostics,
    ) -> DatabaseSettings {
        let mut state = Traversal::default();
        for hint in entry_hints {
            let located = self.locator.locate(hint, start);
            if located.is_empty() {
                diagnostics.warning(PHASE, format!("no file matches '{}'", hint));
            }
            for entry in located {
                self.visit_xml(entry, &mut state, diagnostics);
            }
        }

        let properties = state.properties;
        let resolve = |value: String| substitute(&value, |key| properties.get(key).cloned());
        let declared = state.declared;
        DatabaseSettings {
            username: declared.username.map(resolve),
            password: declared.password.map(resolve),
            url: declared.url.map(resolve),
            driver_class_name: declared.driver_class_name.map(resolve),
        }
    }

    fn visit_xml(&self, entry: Located, state: &mut Traversal, diagnostics: &mut Diagnostics) {
        if !state.visited_xml.insert(entry.file.clone()) {
            return;
        }
        let path = entry.file.path().to_string();
        let modules = self.locator.modules();
        let definitions = modules
            .tree()
            .read(&entry.file)
            .map_err(|e| e.to_string())
            .and_then(|text| BeanDefinitions::parse(&text));
        let definitions = match definitions {
            Ok(definitions) => definitions,
            Err(reason) => {
                diagnostics.push(
                    Diagnostic::warning(
                        PHASE,
                        format!("skipped bean definitions: {}", reason),
                    )
                    .at(&path),
                );
                return;
            }
        };
        debug!(file = %path, imports = definitions.imports.len(), "read bean definitions");

        let module = entry.module;
        state.declared.fill_from(
            definitions
                .datasource
                .map(|value| modules.filter_placeholders(module, &value)),
        );

        for import in &definitions.imports {
            for imported in self.locate_import(import, &entry) {
                self.visit_xml(imported, state, diagnostics);
            }
        }
        for location in &definitions.property_locations {
            for found in self.locate_properties(location, &entry) {
                self.load_properties(found, state, diagnostics);
            }
        }
    }

    /// Imports without a classpath prefix are relative to the importing file.
    fn locate_import(&self, hint: &str, from: &Located) -> Vec<Located> {
        let modules = self.locator.modules();
        let hint = modules.filter_placeholders(from.module, hint);
        match HintKind::of(&hint) {
            HintKind::Path(path) => self.locate_beside(path, from),
            _ => self.locator.locate(&hint, from.module),
        }
    }

    /// Properties locations without a classpath prefix are relative to the
    /// web root when they start with a separator, else to the declaring file.
    fn locate_properties(&self, hint: &str, from: &Located) -> Vec<Located> {
        let modules = self.locator.modules();
        let hint = modules.filter_placeholders(from.module, hint);
        match HintKind::of(&hint) {
            HintKind::Path(path) if path.starts_with('/') => self.locator.locate_in_webroot(path),
            HintKind::Path(path) => self.locate_beside(path, from),
            _ => self.locator.locate(&hint, from.module),
        }
    }

    fn locate_beside(&self, pattern: &str, from: &Located) -> Vec<Located> {
        let tree = self.locator.modules().tree();
        match tree.find_folder(parent_path(from.file.path())) {
            Some(folder) => self.locator.locate_in(&folder, from.module, pattern),
            None => Vec::new(),
        }
    }

    fn load_properties(&self, entry: Located, state: &mut Traversal, diagnostics: &mut Diagnostics) {
        if !state.visited_properties.insert(entry.file.clone()) {
            return;
        }
        let modules = self.locator.modules();
        let parsed = modules
            .tree()
            .read(&entry.file)
            .map_err(|e| e.to_string())
            .and_then(|text| parse_properties(&text));
        match parsed {
            Ok(values) => {
                debug!(file = %entry.file.path(), keys = values.len(), "loaded properties");
                for (key, value) in values {
                    let value = modules.filter_placeholders(entry.module, &value);
                    state.properties.insert(key, value);
                }
            }
            Err(reason) => diagnostics.push(
                Diagnostic::warning(
                    PHASE,
                    format!("skipped properties file: {}", reason),
                )
                .at(entry.file.path()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(password: Option<&str>) -> DatabaseSettings {
        DatabaseSettings {
            username: Some("root".into()),
            password: password.map(str::to_string),
            url: Some("jdbc:mysql://localhost:3306/demo?useSSL=false".into()),
            driver_class_name: Some("com.mysql.jdbc.Driver".into()),
        }
    }

    #[test]
    fn test_ensure_complete() {
        let conn = settings(Some("secret")).ensure_complete().unwrap();
        assert_eq!(conn.database_name(), Some("demo"));
        assert_eq!(conn.masked_password(), "s****t");
    }

    #[test]
    fn test_unresolved_password_is_incomplete() {
        let err = settings(Some("${unresolved}")).ensure_complete().unwrap_err();
        match *err {
            Error::SqlConfigIncomplete { field, problem } => {
                assert_eq!(field, "password");
                assert_eq!(problem, FieldProblem::Unresolved("${unresolved}".into()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_password_is_incomplete() {
        let err = settings(None).ensure_complete().unwrap_err();
        assert!(matches!(
            *err,
            Error::SqlConfigIncomplete {
                field: "password",
                problem: FieldProblem::Missing
            }
        ));
    }

    #[test]
    fn test_database_name_without_path() {
        let mut conn = settings(Some("x")).ensure_complete().unwrap();
        conn.url = "jdbc:mysql://localhost:3306".into();
        assert_eq!(conn.database_name(), None);
        conn.url = "jdbc:mysql://localhost/shop;a=b".into();
        assert_eq!(conn.database_name(), Some("shop"));
    }
}
