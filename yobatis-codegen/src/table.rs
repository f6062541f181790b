//! Table metadata as the generator sees it.

use yobatis_project::{ConnectionSettings, Result, TableSpec};

/// A database table with the key information the generator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub primary_keys: Vec<String>,
    pub auto_increment: Option<String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_keys: Vec::new(),
            auto_increment: None,
        }
    }

    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_keys.push(column.into());
        self
    }

    pub fn with_auto_increment(mut self, column: impl Into<String>) -> Self {
        self.auto_increment = Some(column.into());
        self
    }

    /// The auto-increment column, when it is also the table's only primary key.
    pub fn auto_inc_pk(&self) -> Option<&str> {
        match (self.primary_keys.as_slice(), self.auto_increment.as_deref()) {
            ([pk], Some(column)) if pk == column => Some(pk),
            _ => None,
        }
    }
}

impl From<&TableSpec> for Table {
    fn from(spec: &TableSpec) -> Self {
        Self {
            name: spec.name.clone(),
            primary_keys: spec.primary_keys.clone(),
            auto_increment: spec.auto_increment.clone(),
        }
    }
}

/// Supplies the tables of the database a project connects to.
///
/// The pipeline asks exactly once per run, and only after the connection
/// settings are known to be complete.
pub trait TableSource: Send + Sync {
    fn list_tables(&self, connection: &ConnectionSettings) -> Result<Vec<Table>>;
}

/// A fixed table list, e.g. the `[[tables]]` of `yobatis.toml`.
#[derive(Debug, Clone, Default)]
pub struct StaticTables {
    tables: Vec<Table>,
}

impl StaticTables {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }
}

impl From<&[TableSpec]> for StaticTables {
    fn from(specs: &[TableSpec]) -> Self {
        Self::new(specs.iter().map(Table::from).collect())
    }
}

impl TableSource for StaticTables {
    fn list_tables(&self, _connection: &ConnectionSettings) -> Result<Vec<Table>> {
        Ok(self.tables.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_inc_pk_needs_single_key() {
        let single = Table::new("t").with_primary_key("id").with_auto_increment("id");
        assert_eq!(single.auto_inc_pk(), Some("id"));

        let composite = single.clone().with_primary_key("tenant");
        assert_eq!(composite.auto_inc_pk(), None);

        let other_column = Table::new("t")
            .with_primary_key("id")
            .with_auto_increment("seq");
        assert_eq!(other_column.auto_inc_pk(), None);
        assert_eq!(Table::new("t").auto_inc_pk(), None);
    }

    #[test]
    fn test_static_tables_from_settings() {
        let specs = vec![TableSpec {
            name: "sys_admin".into(),
            primary_keys: vec!["id".into()],
            auto_increment: Some("id".into()),
        }];
        let source = StaticTables::from(specs.as_slice());
        let connection = ConnectionSettings {
            username: "root".into(),
            password: "pw".into(),
            url: "jdbc:mysql://localhost/demo".into(),
            driver_class_name: "com.mysql.jdbc.Driver".into(),
        };
        let tables = source.list_tables(&connection).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].auto_inc_pk(), Some("id"));
    }
}
