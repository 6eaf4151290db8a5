#![forbid(unsafe_code)]

//! Graphviz DOT output for revision graphs.

use std::fmt::Write;
use std::str::FromStr;

use lg_core::{RevisionGraph, RevisionNode, TOOLTIP_BREAK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl RankDir {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl FromStr for RankDir {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            _ => Err(format!(
                "unknown rank direction `{value}` (expected TB, BT, LR or RL)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotRenderConfig {
    pub rank_dir: RankDir,
    /// Emit `tooltip` attributes. Some viewers render them as hover text.
    pub tooltips: bool,
    /// Emit `URL` attributes pointing at the node anchor.
    pub urls: bool,
}

impl Default for DotRenderConfig {
    fn default() -> Self {
        Self {
            rank_dir: RankDir::TopBottom,
            tooltips: true,
            urls: true,
        }
    }
}

#[must_use]
pub fn render_dot(graph: &RevisionGraph, config: &DotRenderConfig) -> String {
    let mut out = String::with_capacity(64 + graph.nodes.len() * 96);
    let _ = writeln!(out, "digraph {} {{", quote(&graph.name));
    let _ = writeln!(out, "  rankdir={};", config.rank_dir.as_str());

    for node in &graph.nodes {
        let _ = writeln!(
            out,
            "  {} [{}];",
            quote(&node.id),
            node_attributes(node, config).join(", ")
        );
    }
    for edge in &graph.edges {
        if let Some((from, to)) = graph.edge_endpoints(edge) {
            let _ = writeln!(out, "  {} -> {};", quote(&from.id), quote(&to.id));
        }
    }
    out.push_str("}\n");
    out
}

fn node_attributes(node: &RevisionNode, config: &DotRenderConfig) -> Vec<String> {
    let mut attrs = vec![format!("label={}", quote(&node.label))];
    if config.urls {
        attrs.push(format!("URL={}", quote(&node.url)));
    }
    if let Some(shape) = node.shape {
        attrs.push(format!("shape={}", shape.as_str()));
    }
    if let Some(style) = node.style {
        attrs.push(format!("style={}", style.as_str()));
    }
    if let Some(color) = &node.fill_color {
        attrs.push(format!("fillcolor={}", quote(color)));
    }
    if config.tooltips
        && let Some(tooltip) = &node.tooltip
    {
        attrs.push(format!("tooltip={}", quote_tooltip(tooltip)));
    }
    attrs
}

/// Double-quoted DOT identifier.
fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Like [`quote`], but the line breaks between tooltip parts stay DOT escapes.
fn quote_tooltip(value: &str) -> String {
    let parts: Vec<String> = value.split(TOOLTIP_BREAK).map(escape).collect();
    format!("\"{}\"", parts.join(TOOLTIP_BREAK))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
