//! Attributes gathered for the entry currently being parsed.
//!
//! Nothing here touches the graph; [`crate::builder::GraphBuilder::commit`]
//! merges a finished entry into its node in one step.

use lg_core::{FileBlockKind, FileChanges, NodeShape, RevisionNodeId, TOOLTIP_BREAK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    node: RevisionNodeId,
    line: usize,
    author_lines: Vec<String>,
    dates: Vec<String>,
    tag_lines: Vec<String>,
    authors: Vec<String>,
    branches: Vec<String>,
    tags: Vec<String>,
    fill_color: Option<&'static str>,
    files: FileChanges,
}

impl PendingEntry {
    #[must_use]
    pub fn new(node: RevisionNodeId, line: usize) -> Self {
        Self {
            node,
            line,
            author_lines: Vec::new(),
            dates: Vec::new(),
            tag_lines: Vec::new(),
            authors: Vec::new(),
            branches: Vec::new(),
            tags: Vec::new(),
            fill_color: None,
            files: FileChanges::default(),
        }
    }

    /// Node the entry will be committed onto.
    #[must_use]
    pub const fn node(&self) -> RevisionNodeId {
        self.node
    }

    /// Line of the entry's `Revision:` header.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Record an author; the latest colored author decides the fill.
    pub fn push_author(&mut self, author: String, color: Option<&'static str>) {
        if color.is_some() {
            self.fill_color = color;
        }
        insert_unique(&mut self.authors, &author);
        self.author_lines.push(author);
    }

    pub fn push_date(&mut self, date: String) {
        self.dates.push(date);
    }

    pub fn push_branch(&mut self, branch: String) {
        insert_unique(&mut self.branches, &branch);
    }

    pub fn push_tag(&mut self, tag: String) {
        insert_unique(&mut self.tags, &tag);
        self.tag_lines.push(tag);
    }

    pub fn set_files(&mut self, kind: FileBlockKind, files: String) {
        self.files.set(kind, files);
    }

    #[must_use]
    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    #[must_use]
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub const fn fill_color(&self) -> Option<&'static str> {
        self.fill_color
    }

    #[must_use]
    pub const fn files(&self) -> &FileChanges {
        &self.files
    }

    #[must_use]
    pub fn shape(&self) -> NodeShape {
        if self.tag_lines.is_empty() {
            NodeShape::Ellipse
        } else {
            NodeShape::Rect
        }
    }

    /// Dates, authors and tags, each comma-joined, separated by break markers.
    #[must_use]
    pub fn tooltip(&self) -> String {
        [
            self.dates.join(","),
            self.author_lines.join(","),
            self.tag_lines.join(","),
        ]
        .join(TOOLTIP_BREAK)
    }
}

pub(crate) fn insert_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use lg_core::{FileBlockKind, NodeShape, RevisionNodeId};

    use super::PendingEntry;

    #[test]
    fn empty_entry_has_bare_tooltip() {
        let entry = PendingEntry::new(RevisionNodeId(0), 2);
        assert_eq!(entry.tooltip(), "\\n\\n");
        assert_eq!(entry.shape(), NodeShape::Ellipse);
        assert_eq!(entry.fill_color(), None);
    }

    #[test]
    fn tooltip_joins_lists_in_order() {
        let mut entry = PendingEntry::new(RevisionNodeId(3), 10);
        entry.push_date("2020-01-01".to_string());
        entry.push_date("2020-01-02".to_string());
        entry.push_author("alice".to_string(), Some("aliceblue"));
        entry.push_author("bob".to_string(), Some("antiquewhite"));
        entry.push_tag("v1".to_string());
        assert_eq!(
            entry.tooltip(),
            "2020-01-01,2020-01-02\\nalice,bob\\nv1"
        );
        assert_eq!(entry.shape(), NodeShape::Rect);
        assert_eq!(entry.fill_color(), Some("antiquewhite"));
    }

    #[test]
    fn sets_deduplicate_but_tooltip_keeps_repeats() {
        let mut entry = PendingEntry::new(RevisionNodeId(0), 1);
        entry.push_author("alice".to_string(), None);
        entry.push_author("alice".to_string(), None);
        entry.push_branch("main".to_string());
        entry.push_branch("main".to_string());
        assert_eq!(entry.authors(), ["alice".to_string()]);
        assert_eq!(entry.branches(), ["main".to_string()]);
        assert_eq!(entry.tooltip(), "\\nalice,alice\\n");
    }

    #[test]
    fn uncolored_author_keeps_previous_fill() {
        let mut entry = PendingEntry::new(RevisionNodeId(0), 1);
        entry.push_author("alice".to_string(), Some("gold"));
        entry.push_author("bob".to_string(), None);
        assert_eq!(entry.fill_color(), Some("gold"));
    }

    #[test]
    fn stores_file_blocks() {
        let mut entry = PendingEntry::new(RevisionNodeId(0), 1);
        entry.set_files(FileBlockKind::AddedFiles, "a b".to_string());
        assert_eq!(entry.files().get(FileBlockKind::AddedFiles), Some("a b"));
    }
}
