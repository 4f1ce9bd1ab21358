//! XML writing utilities.

use std::fmt::Write;

/// Escape an attribute value.
///
/// Markup characters and quotes become entities. Tab, line feed and carriage
/// return become character references so they survive attribute value
/// normalization. The remaining C0 controls, U+FFFE and U+FFFF are not
/// allowed in XML 1.0 and are replaced with U+FFFD.
pub fn escape_attr(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' => escaped.push_str("&#9;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {
                escaped.push(char::REPLACEMENT_CHARACTER)
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write indentation to output.
pub fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Builder for an indented XML document.
///
/// Attributes are written in the order given. Elements must be closed in
/// reverse opening order.
pub struct XmlBuilder {
    output: String,
    indent: usize,
}

impl XmlBuilder {
    /// Start a document with the UTF-8 declaration.
    pub fn new() -> Self {
        let mut output = String::with_capacity(4096);
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        Self { output, indent: 0 }
    }

    fn write_tag(&mut self, name: &str, attrs: &[(&str, &str)], self_closing: bool) {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "<{name}");
        for (key, value) in attrs {
            let _ = write!(self.output, " {}=\"{}\"", key, escape_attr(value));
        }
        self.output.push_str(if self_closing { "/>\n" } else { ">\n" });
    }

    /// Open an element; children are indented one level deeper.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.write_tag(name, attrs, false);
        self.indent += 1;
        self
    }

    /// Close an element opened with [`open`](Self::open).
    pub fn close(&mut self, name: &str) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "</{name}>");
        self
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.write_tag(name, attrs, true);
        self
    }

    /// Current nesting depth.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Finish building and return the document.
    pub fn build(self) -> String {
        debug_assert_eq!(self.indent, 0, "unclosed element");
        self.output
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}
