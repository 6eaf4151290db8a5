//! GXL element primitives with a fluent builder API.

use std::fmt::Write;

use crate::attributes::{Attributes, escape_xml_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Graph,
    Node,
    Edge,
    Attr,
    String,
    Int,
    Bool,
    Tup,
    Set,
}

impl ElementKind {
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::Graph => "graph",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Attr => "attr",
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Tup => "tup",
            Self::Set => "set",
        }
    }

    /// Atomic values always carry text, even when it is empty.
    #[must_use]
    pub const fn is_atomic(self) -> bool {
        matches!(self, Self::String | Self::Int | Self::Bool)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    attrs: Attributes,
    children: Vec<Element>,
    text_content: Option<String>,
}

impl Element {
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            children: Vec::new(),
            text_content: None,
        }
    }

    #[must_use]
    pub fn graph(id: &str) -> Self {
        let mut elem = Self::new(ElementKind::Graph);
        elem.attrs = elem.attrs.set("id", id).set("edgemode", "directed");
        elem
    }

    #[must_use]
    pub fn node(id: &str) -> Self {
        let mut elem = Self::new(ElementKind::Node);
        elem.attrs = elem.attrs.set("id", id);
        elem
    }

    #[must_use]
    pub fn edge(from: &str, to: &str, directed: bool) -> Self {
        let mut elem = Self::new(ElementKind::Edge);
        elem.attrs = elem
            .attrs
            .set("from", from)
            .set("to", to)
            .set("isdirected", directed);
        elem
    }

    /// Named attribute wrapping a single value.
    #[must_use]
    pub fn attr(name: &str, value: Element) -> Self {
        let mut elem = Self::new(ElementKind::Attr);
        elem.attrs = elem.attrs.set("name", name);
        elem.child(value)
    }

    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ElementKind::String).content(text)
    }

    #[must_use]
    pub fn int(value: i64) -> Self {
        Self::new(ElementKind::Int).content(value.to_string())
    }

    #[must_use]
    pub fn bool(value: bool) -> Self {
        Self::new(ElementKind::Bool).content(value.to_string())
    }

    #[must_use]
    pub fn tup<I: IntoIterator<Item = Element>>(values: I) -> Self {
        Self::new(ElementKind::Tup).children(values)
    }

    #[must_use]
    pub fn set<I: IntoIterator<Item = Element>>(values: I) -> Self {
        Self::new(ElementKind::Set).children(values)
    }

    #[must_use]
    pub fn content(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    #[must_use]
    pub fn child(mut self, elem: Element) -> Self {
        self.children.push(elem);
        self
    }

    #[must_use]
    pub fn children<I: IntoIterator<Item = Element>>(mut self, elems: I) -> Self {
        self.children.extend(elems);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::with_capacity(256);
        self.write_to_string(&mut output, None);
        output
    }

    /// Write the element; `depth` enables one element per line at that indent.
    pub fn write_to_string(&self, output: &mut String, depth: Option<usize>) {
        let tag = self.kind.tag_name();
        if let Some(depth) = depth {
            push_indent(output, depth);
        }
        let _ = write!(output, "<{tag}");
        output.push_str(&self.attrs.render());

        if self.children.is_empty() && self.text_content.is_none() && !self.kind.is_atomic() {
            output.push_str("/>");
        } else {
            output.push('>');
            if let Some(ref text) = self.text_content {
                output.push_str(&escape_xml_text(text));
            }

            let nested = depth.filter(|_| !self.is_shallow());
            if let Some(depth) = nested {
                output.push('\n');
                for child in &self.children {
                    child.write_to_string(output, Some(depth + 1));
                }
                push_indent(output, depth);
            } else {
                for child in &self.children {
                    child.write_to_string(output, None);
                }
            }
            let _ = write!(output, "</{tag}>");
        }

        if depth.is_some() {
            output.push('\n');
        }
    }

    /// Attributes and elements holding only leaves stay on one line.
    fn is_shallow(&self) -> bool {
        self.kind == ElementKind::Attr
            || self.children.iter().all(|child| child.children.is_empty())
    }
}

fn push_indent(output: &mut String, depth: usize) {
    for _ in 0..depth {
        output.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_edge_as_empty_element() {
        let edge = Element::edge("a", "b", true);
        assert_eq!(edge.render(), "<edge from=\"a\" to=\"b\" isdirected=\"true\"/>");
    }

    #[test]
    fn empty_string_value_keeps_both_tags() {
        let attr = Element::attr("tooltip", Element::string(""));
        assert_eq!(
            attr.render(),
            "<attr name=\"tooltip\"><string></string></attr>"
        );
    }

    #[test]
    fn renders_tuple_of_ints() {
        let attr = Element::attr("BorderColor", Element::tup([0, 0, 0].map(Element::int)));
        assert_eq!(
            attr.render(),
            "<attr name=\"BorderColor\"><tup><int>0</int><int>0</int><int>0</int></tup></attr>"
        );
    }

    #[test]
    fn escapes_text_content() {
        let value = Element::string("Tom & <Jerry>");
        assert_eq!(value.render(), "<string>Tom &amp; &lt;Jerry&gt;</string>");
    }

    #[test]
    fn indented_output_puts_each_attribute_on_one_line() {
        let node = Element::node("n1")
            .child(Element::attr("label", Element::string("n1")))
            .child(Element::attr(
                "Authors",
                Element::set([Element::string("alice")]),
            ));
        let mut out = String::new();
        node.write_to_string(&mut out, Some(1));
        assert_eq!(
            out,
            "  <node id=\"n1\">\n    <attr name=\"label\"><string>n1</string></attr>\n    \
             <attr name=\"Authors\"><set><string>alice</string></set></attr>\n  </node>\n"
        );
    }

    #[test]
    fn builders_set_kinds() {
        assert_eq!(Element::bool(true).render(), "<bool>true</bool>");
        assert_eq!(Element::graph("g").kind(), ElementKind::Graph);
        assert_eq!(Element::set(Vec::new()).render(), "<set/>");
        assert_eq!(Element::attr("x", Element::int(3)).child_elements().len(), 1);
    }
}
