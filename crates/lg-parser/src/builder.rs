use lg_core::{
    AncestorEdge, AuthorColor, AuthorColorTable, GraphOptions, NodeStyle, Result, RevisionGraph,
    RevisionNode, RevisionNodeId,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::ParseOutcome;
use crate::pending::{PendingEntry, insert_unique};

pub(crate) struct GraphBuilder {
    graph: RevisionGraph,
    node_index_by_id: FxHashMap<String, RevisionNodeId>,
    colors: AuthorColorTable,
    options: GraphOptions,
    entries: usize,
}

impl GraphBuilder {
    pub(crate) fn new(name: String, options: GraphOptions, colors: AuthorColorTable) -> Self {
        Self {
            graph: RevisionGraph::empty(name),
            node_index_by_id: FxHashMap::default(),
            colors,
            options,
            entries: 0,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.graph.name = name;
    }

    pub(crate) fn set_colors(&mut self, colors: AuthorColorTable) {
        self.colors = colors;
    }

    pub(crate) const fn options(&self) -> GraphOptions {
        self.options
    }

    pub(crate) fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edges.len()
    }

    pub(crate) fn finish(self) -> ParseOutcome {
        let author_colors = self
            .colors
            .assignments()
            .map(|(author, color)| AuthorColor::new(author, color))
            .collect();
        ParseOutcome {
            graph: self.graph,
            author_colors,
            entries: self.entries,
        }
    }

    /// Look up a revision's node, creating a placeholder on first reference.
    pub(crate) fn intern_node(&mut self, id: &str) -> RevisionNodeId {
        if let Some(existing) = self.node_index_by_id.get(id) {
            return *existing;
        }

        let node_id = RevisionNodeId(self.graph.nodes.len());
        self.graph
            .nodes
            .push(RevisionNode::placeholder(id, node_id.0));
        self.node_index_by_id.insert(id.to_string(), node_id);
        trace!(revision = id, index = node_id.0, "created node");
        node_id
    }

    pub(crate) fn begin_entry(&mut self, id: &str, line: usize) -> PendingEntry {
        let node = self.intern_node(id);
        PendingEntry::new(node, line)
    }

    pub(crate) fn push_edge(&mut self, from: RevisionNodeId, to: RevisionNodeId, line: usize) {
        self.graph.edges.push(AncestorEdge {
            from,
            to,
            directed: true,
            line,
        });
    }

    /// Color for an author of the current entry, or `None` when coloring is off.
    pub(crate) fn assign_color(&mut self, author: &str) -> Result<Option<&'static str>> {
        if !self.options.color_authors {
            return Ok(None);
        }
        let known = self.colors.color_of(author).is_some();
        let color = self.colors.assign(author)?;
        if !known && let Some(color) = color {
            debug!(author, color, "assigned author color");
        }
        Ok(color)
    }

    /// Freeze an entry's attributes onto its node.
    pub(crate) fn commit(&mut self, entry: PendingEntry) {
        self.entries += 1;
        let shape = entry.shape();
        let tooltip = entry.tooltip();
        let Some(node) = self.graph.node_mut(entry.node()) else {
            warn!(index = entry.node().0, "entry refers to a missing node");
            return;
        };

        if let Some(previous) = node.defined_at {
            warn!(
                revision = node.id.as_str(),
                first = previous,
                again = entry.line(),
                "revision appears in more than one entry"
            );
        }

        node.defined_at = Some(entry.line());
        node.shape = Some(shape);
        node.style = Some(NodeStyle::Filled);
        node.tooltip = Some(tooltip);
        if let Some(color) = entry.fill_color() {
            node.fill_color = Some(color.to_string());
        }
        for author in entry.authors() {
            insert_unique(&mut node.authors, author);
        }
        for branch in entry.branches() {
            insert_unique(&mut node.branches, branch);
        }
        for tag in entry.tags() {
            insert_unique(&mut node.tags, tag);
        }
        for (kind, files) in entry.files().iter() {
            node.files.set(kind, files.to_string());
        }

        debug!(
            revision = node.id.as_str(),
            line = entry.line(),
            authors = node.authors.len(),
            tags = node.tags.len(),
            "committed entry"
        );
    }
}

#[cfg(test)]
mod tests {
    use lg_core::{AuthorColorTable, GraphOptions, NodeShape, NodeStyle, RevisionNodeId};

    use super::GraphBuilder;

    fn builder(options: GraphOptions) -> GraphBuilder {
        GraphBuilder::new(
            "test".to_string(),
            options,
            AuthorColorTable::new(options.color_authors),
        )
    }

    #[test]
    fn interning_is_idempotent() {
        let mut builder = builder(GraphOptions::default());
        let first = builder.intern_node("abc");
        let second = builder.intern_node("def");
        assert_eq!(builder.intern_node("abc"), first);
        assert_ne!(first, second);
        assert_eq!(builder.node_count(), 2);
    }

    #[test]
    fn placeholder_is_completed_in_place() {
        let mut builder = builder(GraphOptions::default());
        let placeholder = builder.intern_node("cafebabe00");
        let mut entry = builder.begin_entry("cafebabe00", 5);
        assert_eq!(entry.node(), placeholder);

        let color = builder.assign_color("alice").unwrap();
        entry.push_author("alice".to_string(), color);
        entry.push_tag("v1".to_string());
        builder.commit(entry);

        let outcome = builder.finish();
        assert_eq!(outcome.graph.nodes.len(), 1);
        let node = &outcome.graph.nodes[0];
        assert_eq!(node.defined_at, Some(5));
        assert_eq!(node.shape, Some(NodeShape::Rect));
        assert_eq!(node.style, Some(NodeStyle::Filled));
        assert_eq!(node.fill_color.as_deref(), Some("aliceblue"));
        assert_eq!(outcome.entries, 1);
        assert_eq!(outcome.author_colors.len(), 1);
    }

    #[test]
    fn coloring_disabled_skips_allocation() {
        let mut builder = builder(GraphOptions {
            color_authors: false,
            include_files: false,
        });
        assert_eq!(builder.assign_color("alice").unwrap(), None);
        let outcome = builder.finish();
        assert!(outcome.author_colors.is_empty());
    }

    #[test]
    fn edges_are_directed_ancestor_to_descendant() {
        let mut builder = builder(GraphOptions::default());
        let child = builder.intern_node("child");
        let parent = builder.intern_node("parent");
        builder.push_edge(parent, child, 3);
        assert_eq!(builder.edge_count(), 1);
        let outcome = builder.finish();
        let edge = outcome.graph.edges[0];
        assert_eq!(edge.from, RevisionNodeId(1));
        assert_eq!(edge.to, RevisionNodeId(0));
        assert!(edge.directed);
    }
}
