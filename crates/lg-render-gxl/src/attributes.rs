//! XML attributes for GXL elements, escaped on render.

use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub value: AttributeValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&escape_xml_attr(s)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Ordered attribute list; rendering keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    attrs: Vec<Attribute>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    #[must_use]
    pub fn set<V: Into<AttributeValue>>(mut self, name: &'static str, value: V) -> Self {
        self.attrs.push(Attribute {
            name,
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attrs.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut result = String::new();
        for attr in &self.attrs {
            let _ = write!(result, " {}=\"{}\"", attr.name, attr.value);
        }
        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape special characters in XML text content.
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_in_insertion_order() {
        let attrs = Attributes::new()
            .set("from", "a")
            .set("to", "b")
            .set("isdirected", true);
        assert_eq!(attrs.render(), " from=\"a\" to=\"b\" isdirected=\"true\"");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("to"), Some(&AttributeValue::from("b")));
    }

    #[test]
    fn escapes_attribute_values() {
        let attrs = Attributes::new().set("name", "A & B < C > D \"E\" 'F'");
        assert_eq!(
            attrs.render(),
            " name=\"A &amp; B &lt; C &gt; D &quot;E&quot; &apos;F&apos;\""
        );
    }

    #[test]
    fn text_escaping_leaves_quotes() {
        assert_eq!(escape_xml_text("a<b & \"c\""), "a&lt;b &amp; \"c\"");
    }
}
