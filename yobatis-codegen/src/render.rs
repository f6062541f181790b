//! Rendering the discovered facts as a generator configuration document.

use yobatis_core::{
    Diagnostic, Diagnostics, concat_path, extract_package_name, parent_path, wipe_package_path,
};
use yobatis_ir::{ConfigDocument, ConfigItem, Context, ContextItem, Element, Node, tags};
use yobatis_project::{ConnectionSettings, ModuleTree};

use crate::{classifier::TableGroup, table::Table};

/// Renames the generated `XxxExample` query classes to `XxxCriteria`.
pub const RENAME_EXAMPLE_PLUGIN: &str = "org.mybatis.generator.plugins.RenameExampleClassPlugin";

/// Generates the dao interfaces.
pub const DAO_PLUGIN: &str = "org.mybatis.generator.plugins.YobatisDaoPlugin";

/// Package, below the resource folder, that mapper XML files go to.
pub const MAPPER_PACKAGE: &str = "mybatis-mappers";

const PHASE: &str = "render";

/// Where one context's generated code goes, and for which tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextModel {
    pub model_package: String,
    /// Source root holding the model package.
    pub model_project: String,
    pub dao_package: String,
    pub dao_project: String,
    /// Resource folder receiving the mapper XML files.
    pub resource_project: String,
    pub tables: Vec<Table>,
}

impl ContextModel {
    /// Find the dao and resource folders paired with a group's model folder.
    ///
    /// Without a matching dao folder the dao package is the model package's
    /// sibling `dao`, in the same source root. Without a resource folder the
    /// conventional `src/main/resources` beside the source root is used.
    pub fn locate(group: TableGroup, modules: &ModuleTree<'_>, diagnostics: &mut Diagnostics) -> Self {
        let model_project = wipe_package_path(group.model_folder.path()).to_string();

        let dao = modules
            .matching_dao_folder(&group.model_folder)
            .and_then(|folder| {
                let package = extract_package_name(folder.path())?;
                Some((package, wipe_package_path(folder.path()).to_string()))
            });
        let (dao_package, dao_project) = match dao {
            Some(found) => found,
            None => {
                let package = sibling_package(&group.package, "dao");
                diagnostics.push(
                    Diagnostic::warning(
                        PHASE,
                        format!(
                            "no dao folder matches '{}', using '{}'",
                            group.package, package
                        ),
                    )
                    .at(group.model_folder.path()),
                );
                (package, model_project.clone())
            }
        };

        let resource_project = match modules.matching_resource_folder(&group.model_folder) {
            Some(folder) => folder.path().to_string(),
            None => {
                let fallback = concat_path(parent_path(&model_project), "resources");
                diagnostics.push(
                    Diagnostic::warning(
                        PHASE,
                        format!("no resource folder for '{}', using '{}'", group.package, fallback),
                    )
                    .at(group.model_folder.path()),
                );
                fallback
            }
        };

        Self {
            model_package: group.package,
            model_project,
            dao_package,
            dao_project,
            resource_project,
            tables: group.tables,
        }
    }

    /// One `context` block, identified by the model package.
    pub fn render(&self, connection: &ConnectionSettings) -> Context {
        let schema = connection.database_name().unwrap_or_default();
        let mut context = Context::new(&self.model_package)
            .item(ContextItem::Plugin(
                Element::new(tags::PLUGIN)
                    .attr("type", RENAME_EXAMPLE_PLUGIN)
                    .child(Element::property("searchString", "Example$"))
                    .child(Element::property("replaceString", "Criteria")),
            ))
            .item(ContextItem::Plugin(
                Element::new(tags::PLUGIN).attr("type", DAO_PLUGIN),
            ))
            .item(ContextItem::JdbcConnection(
                Element::new(tags::JDBC_CONNECTION)
                    .attr("driverClass", &connection.driver_class_name)
                    .attr("connectionURL", &connection.url)
                    .attr("userId", &connection.username)
                    .attr("password", &connection.password),
            ))
            .item(ContextItem::TypeResolver(
                Element::new(tags::TYPE_RESOLVER)
                    .child(Element::property("forceBigDecimals", "false")),
            ))
            .item(ContextItem::ModelGenerator(
                Element::new(tags::MODEL_GENERATOR)
                    .attr("targetPackage", &self.model_package)
                    .attr("targetProject", &self.model_project),
            ))
            .item(ContextItem::SqlMapGenerator(
                Element::new(tags::SQL_MAP_GENERATOR)
                    .attr("targetPackage", MAPPER_PACKAGE)
                    .attr("targetProject", &self.resource_project),
            ))
            .item(ContextItem::ClientGenerator(
                Element::new(tags::CLIENT_GENERATOR)
                    .attr("type", "XMLMAPPER")
                    .attr("targetPackage", &self.dao_package)
                    .attr("targetProject", &self.dao_project),
            ));
        for table in &self.tables {
            context = context.item(ContextItem::Table(table_element(table, schema)));
        }
        context
    }
}

fn table_element(table: &Table, schema: &str) -> Element {
    let element = Element::new(tags::TABLE)
        .attr("tableName", &table.name)
        .attr("schema", schema)
        .attr("modelType", "flat");
    match table.auto_inc_pk() {
        Some(column) => element.child(
            Element::new(tags::GENERATED_KEY)
                .attr("column", column)
                .attr("sqlStatement", "mysql")
                .attr("identity", "true"),
        ),
        None => element,
    }
}

/// `org.demo.model` with `dao` becomes `org.demo.dao`.
fn sibling_package(package: &str, name: &str) -> String {
    match package.rsplit_once('.') {
        Some((parent, _)) => format!("{}.{}", parent, name),
        None => name.to_string(),
    }
}

/// Everything a run contributes to the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfigModel {
    /// Absolute path of the JDBC driver jar, when it could be located.
    pub class_path_entry: Option<String>,
    pub connection: ConnectionSettings,
    pub contexts: Vec<ContextModel>,
}

impl GeneratorConfigModel {
    pub fn render(&self) -> ConfigDocument {
        let entry = self.class_path_entry.as_ref().map(|location| {
            Node::Live(ConfigItem::ClassPathEntry(
                Element::new(tags::CLASS_PATH_ENTRY).attr("location", location),
            ))
        });
        let contexts = self
            .contexts
            .iter()
            .map(|ctx| Node::Live(ConfigItem::Context(ctx.render(&self.connection))));
        ConfigDocument::new(entry.into_iter().chain(contexts).collect())
    }
}
