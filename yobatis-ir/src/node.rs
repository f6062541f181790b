//! Live and commented-out nodes.

use crate::{
    builder::{ToXml, XmlBuilder},
    element::Element,
};

/// A node of the document: either live, or disabled by being commented out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<T> {
    Live(T),
    Commented(Comment<T>),
}

impl<T> Node<T> {
    pub fn as_live(&self) -> Option<&T> {
        match self {
            Node::Live(item) => Some(item),
            Node::Commented(_) => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment<T>> {
        match self {
            Node::Live(_) => None,
            Node::Commented(comment) => Some(comment),
        }
    }
}

impl<T: ToXml> ToXml for Node<T> {
    fn write_xml(&self, out: &mut XmlBuilder) {
        match self {
            Node::Live(item) => item.write_xml(out),
            Node::Commented(comment) => comment.write_xml(out),
        }
    }
}

/// A comment, together with the elements its text describes.
///
/// `<!--table tableName="a"/-->` describes one `table` element: restoring the
/// brackets around the text yields well-formed XML. A comment whose text does
/// not restore to elements is a plain remark and describes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment<T> {
    text: String,
    items: Vec<T>,
}

impl<T> Comment<T> {
    /// Interpret a comment's text, converting every described element.
    pub fn parse(text: &str, convert: impl Fn(Element) -> T) -> Self {
        let items = uncomment(text)
            .map(|elements| elements.into_iter().map(convert).collect())
            .unwrap_or_default();
        Self {
            text: text.to_string(),
            items,
        }
    }

    /// A comment that describes nothing.
    pub fn remark(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            items: Vec::new(),
        }
    }

    /// The verbatim comment text, without `<!--` and `-->`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Elements described by this comment.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_remark(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: ToXml> Comment<T> {
    /// Comment out an item that would be rendered at `level`.
    ///
    /// The item's markup loses its leading `<` and trailing `>`, so the
    /// comment reads `<!--table .../-->`. A `--` in the markup, which a
    /// comment may not contain, keeps its second dash as `&#45;`; parsing
    /// the restored element turns it back into `-`.
    pub fn wrap(item: T, level: usize) -> Self {
        let rendered = item.to_xml(level);
        let trimmed = rendered.trim();
        let inner = trimmed
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(trimmed);
        Self {
            text: inner.replace("--", "-&#45;"),
            items: vec![item],
        }
    }
}

impl<T> ToXml for Comment<T> {
    fn write_xml(&self, out: &mut XmlBuilder) {
        out.push_line(&format!("<!--{}-->", self.text));
    }
}

/// Restore a comment's brackets and parse what is inside.
fn uncomment(text: &str) -> Option<Vec<Element>> {
    let restored = format!("<wrapper><{}></wrapper>", text);
    let doc = roxmltree::Document::parse(&restored).ok()?;
    let elements: Vec<Element> = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .map(Element::from_node)
        .collect();
    (!elements.is_empty()).then_some(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_element() {
        let comment = Comment::parse("table tableName=\"a\"/", |e| e);
        assert_eq!(comment.items().len(), 1);
        assert_eq!(comment.items()[0].attribute("tableName"), Some("a"));
    }

    #[test]
    fn test_parse_several_elements() {
        let comment = Comment::parse(
            "table tableName=\"table1\" schema=\"schema\" />\n    <table tableName=\"table2\" schema=\"schema\" /",
            |e| e,
        );
        let names: Vec<_> = comment
            .items()
            .iter()
            .filter_map(|e| e.attribute("tableName"))
            .collect();
        assert_eq!(names, vec!["table1", "table2"]);
    }

    #[test]
    fn test_parse_remarks() {
        assert!(Comment::parse(" just a note ", |e| e).is_remark());
        assert!(Comment::parse("test", |e| e).is_remark());
        assert!(!Comment::parse("test/", |e| e).is_remark());
    }

    #[test]
    fn test_wrap_strips_brackets() {
        let comment = Comment::wrap(Element::new("table").attr("tableName", "a"), 2);
        assert_eq!(comment.text(), "table tableName=\"a\"/");
        assert_eq!(comment.to_xml(2), "    <!--table tableName=\"a\"/-->\n");
    }

    #[test]
    fn test_wrap_then_parse_describes_same_element() {
        let element = Element::new("plugin").attr("type", "x");
        let wrapped = Comment::wrap(element.clone(), 2);
        let parsed = Comment::parse(wrapped.text(), |e| e);
        assert_eq!(parsed.items(), &[element]);
    }

    #[test]
    fn test_wrap_escapes_double_dash() {
        let element = Element::new("jdbcConnection")
            .attr("connectionURL", "jdbc:mysql://db/demo?x=---y")
            .attr("password", "p--w");
        let wrapped = Comment::wrap(element.clone(), 2);
        assert!(!wrapped.text().contains("--"), "{}", wrapped.text());

        let parsed = Comment::parse(wrapped.text(), |e| e);
        assert_eq!(parsed, wrapped);
        assert_eq!(parsed.items()[0].attribute("password"), Some("p--w"));
    }
}
