//! Small helpers over `roxmltree` shared by the descriptor readers.
//!
//! Element lookups compare local names only, so a pom with the maven
//! namespace and one without read the same.

use roxmltree::{Document, Node, ParsingOptions};

/// Parse a document and check its root element's local name.
pub(crate) fn parse_rooted<'i>(text: &'i str, root: &str) -> Result<Document<'i>, String> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options).map_err(|e| e.to_string())?;
    let found = doc.root_element().tag_name().name();
    if found != root {
        return Err(format!("expected root element '{}', found '{}'", root, found));
    }
    Ok(doc)
}

/// Child elements with the given local name.
pub(crate) fn children<'a, 'i>(
    node: Node<'a, 'i>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// First child element with the given local name.
pub(crate) fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Follow a chain of child element names.
pub(crate) fn descend<'a, 'i>(node: Node<'a, 'i>, path: &[&str]) -> Option<Node<'a, 'i>> {
    path.iter().try_fold(node, |current, name| child(current, name))
}

/// Trimmed text content of an element, `None` when blank.
pub(crate) fn text(node: Node<'_, '_>) -> Option<String> {
    let joined: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed text of the named child element.
pub(crate) fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name).and_then(text)
}

/// Trimmed, non-blank attribute value.
pub(crate) fn attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
