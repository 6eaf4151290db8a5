#![forbid(unsafe_code)]

//! GXL serialization of revision graphs.
//!
//! Output follows the attribute layout graph editors expect from a revision
//! log: identity attributes on every node, presentation attributes and the
//! author, branch and tag sets on nodes whose entry was seen.

mod attributes;
mod document;
mod element;

pub use attributes::{Attribute, AttributeValue, Attributes, escape_xml_text};
pub use document::{GXL_DOCTYPE, GxlDocument, XML_DECLARATION};
pub use element::{Element, ElementKind};

use lg_core::{AncestorEdge, RevisionGraph, RevisionNode};

#[derive(Debug, Clone, Default)]
pub struct GxlRenderConfig {
    /// Indent nested elements one per line.
    pub pretty: bool,
}

#[must_use]
pub fn render_gxl(graph: &RevisionGraph) -> String {
    render_gxl_with_config(graph, &GxlRenderConfig::default())
}

#[must_use]
pub fn render_gxl_with_config(graph: &RevisionGraph, config: &GxlRenderConfig) -> String {
    let body = Element::graph(&graph.name)
        .children(graph.nodes.iter().map(render_node))
        .children(
            graph
                .edges
                .iter()
                .filter_map(|edge| render_edge(graph, edge)),
        );
    GxlDocument::new()
        .pretty(config.pretty)
        .graph(body)
        .to_string()
}

fn render_node(node: &RevisionNode) -> Element {
    let geometry = node.geometry;
    let mut elem = Element::node(&node.id)
        .child(Element::attr("Label", Element::string(&node.label)))
        .child(Element::attr("label", Element::string(&node.label)))
        .child(Element::attr("URL", Element::string(&node.url)))
        .child(Element::attr(
            "BorderColor",
            Element::tup(geometry.border_color.map(|c| Element::int(i64::from(c)))),
        ))
        .child(Element::attr(
            "Bounds",
            Element::tup(
                [geometry.x, geometry.y, geometry.width, geometry.height]
                    .map(|v| Element::int(i64::from(v))),
            ),
        ));

    if let Some(style) = node.style {
        elem = elem.child(Element::attr("style", Element::string(style.as_str())));
    }
    if let Some(shape) = node.shape {
        elem = elem.child(Element::attr("shape", Element::string(shape.as_str())));
    }
    if let Some(color) = &node.fill_color {
        elem = elem.child(Element::attr("fillcolor", Element::string(color)));
    }
    if let Some(tooltip) = &node.tooltip {
        elem = elem.child(Element::attr("tooltip", Element::string(tooltip)));
    }

    if !node.is_placeholder() {
        for (name, values) in [
            ("Authors", &node.authors),
            ("Branches", &node.branches),
            ("Tags", &node.tags),
        ] {
            elem = elem.child(Element::attr(name, string_set(values)));
        }
    }

    for (kind, files) in node.files.iter() {
        elem = elem.child(Element::attr(kind.attribute_name(), Element::string(files)));
    }
    elem
}

fn string_set(values: &[String]) -> Element {
    Element::set(values.iter().map(Element::string))
}

fn render_edge(graph: &RevisionGraph, edge: &AncestorEdge) -> Option<Element> {
    let (from, to) = graph.edge_endpoints(edge)?;
    Some(Element::edge(&from.id, &to.id, edge.directed))
}
