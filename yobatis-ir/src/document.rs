//! The whole `generatorConfiguration` document.

use thiserror::Error;

use crate::{
    builder::{ToXml, XmlBuilder},
    context::{Context, tags},
    dtd::{ROOT_ELEMENT, doctype},
    element::{Child, Element},
    node::{Comment, Node},
};

/// Failure to read a configuration document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected root element '{expected}', found '{found}'")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("context #{index} has no id attribute")]
    MissingContextId { index: usize },
}

/// One top-level child of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigItem {
    ClassPathEntry(Element),
    Context(Context),
    /// `properties` or anything unknown.
    Other(Element),
}

impl ConfigItem {
    pub fn as_context(&self) -> Option<&Context> {
        match self {
            ConfigItem::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn as_class_path_entry(&self) -> Option<&Element> {
        match self {
            ConfigItem::ClassPathEntry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for ConfigItem {
    fn from(element: Element) -> Self {
        match element.name() {
            tags::CLASS_PATH_ENTRY => ConfigItem::ClassPathEntry(element),
            tags::CONTEXT => ConfigItem::Context(Context::from_element(element)),
            _ => ConfigItem::Other(element),
        }
    }
}

impl ToXml for ConfigItem {
    fn write_xml(&self, out: &mut XmlBuilder) {
        match self {
            ConfigItem::ClassPathEntry(e) | ConfigItem::Other(e) => e.write_xml(out),
            ConfigItem::Context(ctx) => ctx.write_xml(out),
        }
    }
}

/// A parsed or generated configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    nodes: Vec<Node<ConfigItem>>,
}

impl ConfigDocument {
    pub fn new(nodes: Vec<Node<ConfigItem>>) -> Self {
        Self { nodes }
    }

    /// Parse document text. The DOCTYPE is accepted but never fetched.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(ParseError::UnexpectedRoot {
                expected: ROOT_ELEMENT,
                found: root.tag_name().name().to_string(),
            });
        }

        let (_, _, children) = Element::from_node(root).into_parts();
        let nodes: Vec<Node<ConfigItem>> = children
            .into_iter()
            .filter_map(|child| match child {
                Child::Element(e) => Some(Node::Live(ConfigItem::from(e))),
                Child::Comment(text) => {
                    Some(Node::Commented(Comment::parse(&text, ConfigItem::from)))
                }
                Child::Text(_) => None,
            })
            .collect();

        let contexts = nodes
            .iter()
            .filter_map(Node::as_live)
            .filter_map(ConfigItem::as_context);
        for (index, ctx) in contexts.enumerate() {
            if ctx.id().is_none_or(str::is_empty) {
                return Err(ParseError::MissingContextId { index });
            }
        }

        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[Node<ConfigItem>] {
        &self.nodes
    }

    /// The first live `classPathEntry`.
    pub fn class_path_entry(&self) -> Option<&Element> {
        self.nodes
            .iter()
            .filter_map(Node::as_live)
            .find_map(ConfigItem::as_class_path_entry)
    }

    /// Live contexts in document order.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.nodes
            .iter()
            .filter_map(Node::as_live)
            .filter_map(ConfigItem::as_context)
    }

    /// Contexts described by comments.
    pub fn commented_contexts(&self) -> impl Iterator<Item = &Context> {
        self.nodes
            .iter()
            .filter_map(Node::as_comment)
            .flat_map(|c| c.items().iter())
            .filter_map(ConfigItem::as_context)
    }

    /// Serialize with the XML declaration and DOCTYPE. Blank lines are
    /// dropped, except inside comments.
    pub fn render(&self) -> String {
        let mut out = XmlBuilder::new();
        out.push_line(r#"<?xml version="1.0" encoding="UTF-8"?>"#)
            .push_line(&doctype());
        if self.nodes.is_empty() {
            out.push_line(&format!("<{}/>", ROOT_ELEMENT));
        } else {
            out.push_line(&format!("<{}>", ROOT_ELEMENT)).push_indent();
            for node in &self.nodes {
                out.emit(node);
            }
            out.push_dedent()
                .push_line(&format!("</{}>", ROOT_ELEMENT));
        }
        let mut rendered = String::new();
        let mut in_comment = false;
        for line in out.build().lines() {
            if in_comment || !line.trim().is_empty() {
                rendered.push_str(line);
                rendered.push('\n');
            }
            in_comment = ends_inside_comment(line, in_comment);
        }
        rendered
    }
}

/// Whether a comment is still open at the end of `line`.
fn ends_inside_comment(line: &str, mut inside: bool) -> bool {
    let mut rest = line;
    loop {
        let marker = if inside { "-->" } else { "<!--" };
        match rest.find(marker) {
            Some(at) => {
                rest = &rest[at + marker.len()..];
                inside = !inside;
            }
            None => return inside,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE generatorConfiguration PUBLIC "-//mybatis.org//DTD MyBatis Generator Configuration 1.0//EN" "http://mybatis.org/dtd/mybatis-generator-config_1_0.dtd">
<generatorConfiguration>
  <classPathEntry location="/repo/mysql.jar"/>
  <context id="org.demo.model" targetRuntime="MyBatis3">
    <jdbcConnection driverClass="com.mysql.jdbc.Driver" connectionURL="jdbc:mysql://localhost/demo" userId="root" password="pw"/>
    <table tableName="t1" schema="demo" modelType="flat"/>
    <!--table tableName="t2" schema="demo" modelType="flat"/-->
    <!-- remember to regenerate -->
  </context>
  <!--context id="old" targetRuntime="MyBatis3">
    <table tableName="t3"/>
  </context-->
</generatorConfiguration>
"#;

    #[test]
    fn test_parse_structure() {
        let doc = ConfigDocument::parse(EXISTING).unwrap();
        assert_eq!(
            doc.class_path_entry().and_then(|e| e.attribute("location")),
            Some("/repo/mysql.jar")
        );

        let contexts: Vec<_> = doc.contexts().collect();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].id(), Some("org.demo.model"));
        assert_eq!(
            contexts[0].live_table_names().collect::<Vec<_>>(),
            vec!["t1"]
        );
        assert_eq!(
            contexts[0].table_names().collect::<Vec<_>>(),
            vec!["t1", "t2"]
        );

        let commented: Vec<_> = doc.commented_contexts().collect();
        assert_eq!(commented.len(), 1);
        assert_eq!(commented[0].id(), Some("old"));
    }

    #[test]
    fn test_render_is_stable() {
        let doc = ConfigDocument::parse(EXISTING).unwrap();
        assert_eq!(doc.render(), EXISTING);
        let reparsed = ConfigDocument::parse(&doc.render()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_rejects_wrong_root() {
        let err = ConfigDocument::parse("<beans/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_rejects_context_without_id() {
        let err = ConfigDocument::parse(
            "<generatorConfiguration><context targetRuntime=\"MyBatis3\"/></generatorConfiguration>",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingContextId { index: 0 }));
    }

    #[test]
    fn test_rejects_malformed_xml() {
        let err = ConfigDocument::parse("<generatorConfiguration>").unwrap_err();
        assert!(matches!(err, ParseError::Xml(_)));
    }

    #[test]
    fn test_render_keeps_blank_lines_inside_comments() {
        let text = "<generatorConfiguration>\n  <!-- first\n\n   second -->\n\n  <context id=\"a\">\n    <!--table tableName=\"t1\"\n\n      schema=\"s\"/-->\n  </context>\n</generatorConfiguration>\n";
        let doc = ConfigDocument::parse(text).unwrap();
        let rendered = doc.render();

        assert!(rendered.contains("<!-- first\n\n   second -->\n"), "{}", rendered);
        assert!(rendered.contains("tableName=\"t1\"\n\n      schema"), "{}", rendered);
        assert!(!rendered.contains("-->\n\n"), "blank lines outside comments are dropped");
        assert_eq!(ConfigDocument::parse(&rendered).unwrap().render(), rendered);
    }

    #[test]
    fn test_ends_inside_comment() {
        assert!(ends_inside_comment("  <!-- open", false));
        assert!(!ends_inside_comment("  <!-- closed -->", false));
        assert!(!ends_inside_comment("still --> <!-- again -->", true));
        assert!(ends_inside_comment("", true));
    }
}
