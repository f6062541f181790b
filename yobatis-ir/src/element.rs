//! Generic XML element used for everything the document model does not
//! distinguish further.

use indexmap::IndexMap;

use crate::builder::{ToXml, XmlBuilder, escape_attr, escape_text};

/// Content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(Element),
    /// A comment, kept verbatim.
    Comment(String),
    /// Non-blank character data, trimmed.
    Text(String),
}

/// An XML element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Child>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    /// `<property name=".." value=".."/>`, the DTD's generic key/value child.
    pub fn property(name: &str, value: &str) -> Self {
        Self::new("property").attr("name", name).attr("value", value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Child elements, skipping comments and text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Child::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Split into name, attributes and children.
    pub fn into_parts(self) -> (String, IndexMap<String, String>, Vec<Child>) {
        (self.name, self.attributes, self.children)
    }

    pub(crate) fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = Element::new(node.tag_name().name());
        for attribute in node.attributes() {
            element
                .attributes
                .insert(attribute.name().to_string(), attribute.value().to_string());
        }
        for child in node.children() {
            if child.is_element() {
                element.children.push(Child::Element(Element::from_node(child)));
            } else if child.is_comment() {
                let text = child.text().unwrap_or_default();
                element.children.push(Child::Comment(text.to_string()));
            } else if child.is_text() {
                let text = child.text().unwrap_or_default().trim();
                if !text.is_empty() {
                    element.children.push(Child::Text(text.to_string()));
                }
            }
        }
        element
    }

    /// `<name a="b"` without the closing bracket.
    pub(crate) fn open_tag(name: &str, attributes: &IndexMap<String, String>) -> String {
        let mut tag = format!("<{}", name);
        for (key, value) in attributes {
            tag.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
        }
        tag
    }
}

impl ToXml for Child {
    fn write_xml(&self, out: &mut XmlBuilder) {
        match self {
            Child::Element(e) => {
                out.emit(e);
            }
            Child::Comment(text) => {
                out.push_line(&format!("<!--{}-->", text));
            }
            Child::Text(text) => {
                out.push_line(&escape_text(text));
            }
        }
    }
}

impl ToXml for Element {
    fn write_xml(&self, out: &mut XmlBuilder) {
        let open = Element::open_tag(&self.name, &self.attributes);
        match self.children.as_slice() {
            [] => {
                out.push_line(&format!("{}/>", open));
            }
            [Child::Text(text)] => {
                out.push_line(&format!("{}>{}</{}>", open, escape_text(text), self.name));
            }
            children => {
                out.push_line(&format!("{}>", open)).push_indent();
                for child in children {
                    out.emit(child);
                }
                out.push_dedent().push_line(&format!("</{}>", self.name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_element() {
        let e = Element::new("table")
            .attr("tableName", "sys_user")
            .attr("modelType", "flat");
        assert_eq!(
            e.to_xml(0),
            "<table tableName=\"sys_user\" modelType=\"flat\"/>\n"
        );
    }

    #[test]
    fn test_render_nested_element() {
        let e = Element::new("plugin")
            .attr("type", "p")
            .child(Element::property("searchString", "Example$"));
        assert_eq!(
            e.to_xml(1),
            "  <plugin type=\"p\">\n    <property name=\"searchString\" value=\"Example$\"/>\n  </plugin>\n"
        );
    }

    #[test]
    fn test_from_node_keeps_comments_and_order() {
        let doc = roxmltree::Document::parse(
            "<table b=\"2\" a=\"1\">\n  <!-- note -->\n  <generatedKey column=\"id\"/>\n</table>",
        )
        .unwrap();
        let e = Element::from_node(doc.root_element());
        let keys: Vec<_> = e.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(e.children().len(), 2);
        assert_eq!(e.children()[0], Child::Comment(" note ".to_string()));
        assert_eq!(e.elements().next().unwrap().name(), "generatedKey");
    }

    #[test]
    fn test_attribute_escaping() {
        let e = Element::new("jdbcConnection").attr("connectionURL", "jdbc:mysql://h/db?a=1&b=2");
        assert_eq!(
            e.to_xml(0),
            "<jdbcConnection connectionURL=\"jdbc:mysql://h/db?a=1&amp;b=2\"/>\n"
        );
    }
}
