//! The `context` block and the elements it can hold.

use indexmap::IndexMap;

use crate::{
    builder::{ToXml, XmlBuilder},
    element::{Child, Element},
    node::{Comment, Node},
};

/// Element names of the generator configuration DTD.
pub mod tags {
    pub const CLASS_PATH_ENTRY: &str = "classPathEntry";
    pub const CONTEXT: &str = "context";
    pub const PLUGIN: &str = "plugin";
    pub const JDBC_CONNECTION: &str = "jdbcConnection";
    pub const TYPE_RESOLVER: &str = "javaTypeResolver";
    pub const MODEL_GENERATOR: &str = "javaModelGenerator";
    pub const SQL_MAP_GENERATOR: &str = "sqlMapGenerator";
    pub const CLIENT_GENERATOR: &str = "javaClientGenerator";
    pub const TABLE: &str = "table";
    pub const GENERATED_KEY: &str = "generatedKey";
}

/// The only target runtime the generated contexts use.
pub const TARGET_RUNTIME: &str = "MyBatis3";

/// One child of a context, tagged by the role it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextItem {
    Plugin(Element),
    JdbcConnection(Element),
    TypeResolver(Element),
    ModelGenerator(Element),
    SqlMapGenerator(Element),
    ClientGenerator(Element),
    Table(Element),
    /// Anything else the DTD allows (`property`, `commentGenerator`, ...).
    Other(Element),
}

impl ContextItem {
    pub fn element(&self) -> &Element {
        match self {
            ContextItem::Plugin(e)
            | ContextItem::JdbcConnection(e)
            | ContextItem::TypeResolver(e)
            | ContextItem::ModelGenerator(e)
            | ContextItem::SqlMapGenerator(e)
            | ContextItem::ClientGenerator(e)
            | ContextItem::Table(e)
            | ContextItem::Other(e) => e,
        }
    }

    pub fn tag(&self) -> &str {
        self.element().name()
    }

    /// `tableName` of a table element.
    pub fn table_name(&self) -> Option<&str> {
        match self {
            ContextItem::Table(e) => e.attribute("tableName"),
            _ => None,
        }
    }

    /// `type` of a plugin element.
    pub fn plugin_type(&self) -> Option<&str> {
        match self {
            ContextItem::Plugin(e) => e.attribute("type"),
            _ => None,
        }
    }

    /// Returns true for the three generator elements a context needs exactly one of.
    pub fn is_generator(&self) -> bool {
        matches!(
            self,
            ContextItem::ModelGenerator(_)
                | ContextItem::SqlMapGenerator(_)
                | ContextItem::ClientGenerator(_)
        )
    }
}

impl From<Element> for ContextItem {
    fn from(element: Element) -> Self {
        match element.name() {
            tags::PLUGIN => ContextItem::Plugin(element),
            tags::JDBC_CONNECTION => ContextItem::JdbcConnection(element),
            tags::TYPE_RESOLVER => ContextItem::TypeResolver(element),
            tags::MODEL_GENERATOR => ContextItem::ModelGenerator(element),
            tags::SQL_MAP_GENERATOR => ContextItem::SqlMapGenerator(element),
            tags::CLIENT_GENERATOR => ContextItem::ClientGenerator(element),
            tags::TABLE => ContextItem::Table(element),
            _ => ContextItem::Other(element),
        }
    }
}

impl ToXml for ContextItem {
    fn write_xml(&self, out: &mut XmlBuilder) {
        self.element().write_xml(out);
    }
}

/// A `context` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    attributes: IndexMap<String, String>,
    nodes: Vec<Node<ContextItem>>,
}

impl Context {
    /// An empty context with the given id and the MyBatis3 runtime.
    pub fn new(id: impl Into<String>) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("id".to_string(), id.into());
        attributes.insert("targetRuntime".to_string(), TARGET_RUNTIME.to_string());
        Self {
            attributes,
            nodes: Vec::new(),
        }
    }

    /// Same attributes, different children.
    pub fn with_nodes(&self, nodes: Vec<Node<ContextItem>>) -> Self {
        Self {
            attributes: self.attributes.clone(),
            nodes,
        }
    }

    /// Builder-style live child.
    pub fn item(mut self, item: ContextItem) -> Self {
        self.nodes.push(Node::Live(item));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn nodes(&self) -> &[Node<ContextItem>] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node<ContextItem>> {
        self.nodes
    }

    /// Live children.
    pub fn live_items(&self) -> impl Iterator<Item = &ContextItem> {
        self.nodes.iter().filter_map(Node::as_live)
    }

    /// Children described by comments.
    pub fn commented_items(&self) -> impl Iterator<Item = &ContextItem> {
        self.nodes
            .iter()
            .filter_map(Node::as_comment)
            .flat_map(|c| c.items().iter())
    }

    /// Names of live tables.
    pub fn live_table_names(&self) -> impl Iterator<Item = &str> {
        self.live_items().filter_map(ContextItem::table_name)
    }

    /// Names of every table, live or commented.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.live_items()
            .chain(self.commented_items())
            .filter_map(ContextItem::table_name)
    }

    pub fn has_live_table(&self) -> bool {
        self.live_table_names().next().is_some()
    }

    /// Count live elements with the given tag.
    pub fn count_live(&self, tag: &str) -> usize {
        self.live_items().filter(|i| i.tag() == tag).count()
    }

    /// This context with every commented child turned live and remarks dropped.
    ///
    /// A commented-out context cannot contain comments of its own, so this is
    /// the form used when the whole block is disabled.
    pub fn flattened(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .flat_map(|node| match node {
                Node::Live(item) => vec![Node::Live(item.clone())],
                Node::Commented(comment) => {
                    comment.items().iter().cloned().map(Node::Live).collect()
                }
            })
            .collect();
        self.with_nodes(nodes)
    }

    pub(crate) fn from_element(element: Element) -> Self {
        let (_, attributes, children) = element.into_parts();
        let nodes = children
            .into_iter()
            .filter_map(|child| match child {
                Child::Element(e) => Some(Node::Live(ContextItem::from(e))),
                Child::Comment(text) => Some(Node::Commented(Comment::parse(
                    &text,
                    ContextItem::from,
                ))),
                Child::Text(_) => None,
            })
            .collect();
        Self { attributes, nodes }
    }
}

impl ToXml for Context {
    fn write_xml(&self, out: &mut XmlBuilder) {
        let open = Element::open_tag(tags::CONTEXT, &self.attributes);
        if self.nodes.is_empty() {
            out.push_line(&format!("{}/>", open));
            return;
        }
        out.push_line(&format!("{}>", open)).push_indent();
        for node in &self.nodes {
            out.emit(node);
        }
        out.push_dedent()
            .push_line(&format!("</{}>", tags::CONTEXT));
    }
}
