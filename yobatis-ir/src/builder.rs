//! Indented XML text builder.

/// Two spaces per nesting level.
const INDENT: &str = "  ";

/// Something that can write itself as XML lines.
pub trait ToXml {
    fn write_xml(&self, out: &mut XmlBuilder);

    /// Render at the given nesting level.
    fn to_xml(&self, level: usize) -> String {
        let mut out = XmlBuilder::at_level(level);
        self.write_xml(&mut out);
        out.build()
    }
}

/// Line-oriented builder that tracks the current nesting level.
///
/// ```
/// use yobatis_ir::XmlBuilder;
///
/// let mut out = XmlBuilder::new();
/// out.push_line("<context>").push_indent().push_line("<table/>").push_dedent().push_line("</context>");
/// assert_eq!(out.build(), "<context>\n  <table/>\n</context>\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlBuilder {
    level: usize,
    buffer: String,
}

impl XmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given nesting level.
    pub fn at_level(level: usize) -> Self {
        Self {
            level,
            buffer: String::new(),
        }
    }

    /// Add a line with the current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.level {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Increase the nesting level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decrease the nesting level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Emit a node at the current level.
    pub fn emit(&mut self, node: &impl ToXml) -> &mut Self {
        node.write_xml(self);
        self
    }

    /// The text written so far.
    pub fn build(self) -> String {
        self.buffer
    }
}

/// Escape text for use inside a double-quoted attribute value.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape character data.
pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
