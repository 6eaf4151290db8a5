//! GXL document root.

use std::fmt;
use std::io;

use crate::element::Element;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
pub const GXL_DOCTYPE: &str =
    "<!DOCTYPE gxl SYSTEM \"http://www.gupro.de/GXL/gxl-1.0.dtd\">";
const GXL_OPEN: &str = "<gxl xmlns:xlink=\"http://www.w3.org/1999/xlink\">";

#[derive(Debug, Clone, Default)]
pub struct GxlDocument {
    graphs: Vec<Element>,
    pretty: bool,
}

impl GxlDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent nested elements one per line.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn graph(mut self, graph: Element) -> Self {
        self.graphs.push(graph);
        self
    }

    pub fn write_to_string(&self, output: &mut String) {
        output.push_str(XML_DECLARATION);
        output.push('\n');
        output.push_str(GXL_DOCTYPE);
        output.push('\n');
        output.push_str(GXL_OPEN);
        let depth = if self.pretty {
            output.push('\n');
            Some(1)
        } else {
            None
        };
        for graph in &self.graphs {
            graph.write_to_string(output, depth);
        }
        output.push_str("</gxl>\n");
    }

    pub fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_string().as_bytes())
    }
}

impl fmt::Display for GxlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = String::with_capacity(4096);
        self.write_to_string(&mut output);
        f.write_str(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_prolog_and_root() {
        let doc = GxlDocument::new().to_string();
        assert!(doc.starts_with(XML_DECLARATION));
        assert!(doc.contains(GXL_DOCTYPE));
        assert!(doc.ends_with("<gxl xmlns:xlink=\"http://www.w3.org/1999/xlink\"></gxl>\n"));
    }

    #[test]
    fn pretty_document_indents_graph() {
        let doc = GxlDocument::new()
            .pretty(true)
            .graph(Element::graph("g"))
            .to_string();
        assert!(doc.contains("\n  <graph id=\"g\" edgemode=\"directed\"/>\n</gxl>\n"));
    }

    #[test]
    fn writes_to_io_sink() {
        let mut sink = Vec::new();
        GxlDocument::new()
            .graph(Element::graph("g"))
            .write_to(&mut sink)
            .unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("<graph id=\"g\" edgemode=\"directed\"/></gxl>"));
    }
}
