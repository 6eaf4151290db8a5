#![forbid(unsafe_code)]

mod palette;

pub use palette::{AuthorColor, AuthorColorTable, PALETTE};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entry separator emitted by the log writer before every revision.
pub const ENTRY_SEPARATOR: &str =
    "-----------------------------------------------------------------";

/// Default name given to the graph element of serialized output.
pub const DEFAULT_GRAPH_NAME: &str = "Revision Log";

/// Number of identifier characters shown in a node label.
pub const LABEL_LENGTH: usize = 8;

/// Marker joining the tooltip parts; renderers see a literal backslash-n.
pub const TOOLTIP_BREAK: &str = "\\n";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ErrorKind {
    #[default]
    EndOfInput,
    FormatMismatch,
    Io,
    Configuration,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EndOfInput => "loggraph/error/end-of-input",
            Self::FormatMismatch => "loggraph/error/format-mismatch",
            Self::Io => "loggraph/error/io",
            Self::Configuration => "loggraph/error/configuration",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum LogGraphError {
    #[error("{line}: unexpected end of input")]
    UnexpectedEof { line: usize },
    #[error("{line}: expected [{expected}], got [{found}]")]
    Mismatch {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("{line}: read failed: {message}")]
    Io { line: usize, message: String },
    #[error("illegal color {color} for author {author} in author color map")]
    UnknownColor { author: String, color: String },
    #[error("{line}: malformed author color entry [{content}]")]
    MalformedOverride { line: usize, content: String },
    #[error("color palette exhausted: no color left for author {author} ({palette_size} colors)")]
    PaletteExhausted { author: String, palette_size: usize },
}

impl LogGraphError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedEof { .. } => ErrorKind::EndOfInput,
            Self::Mismatch { .. } => ErrorKind::FormatMismatch,
            Self::Io { .. } => ErrorKind::Io,
            Self::UnknownColor { .. }
            | Self::MalformedOverride { .. }
            | Self::PaletteExhausted { .. } => ErrorKind::Configuration,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Input line the failure was detected on, when it came from the log stream.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof { line }
            | Self::Mismatch { line, .. }
            | Self::Io { line, .. }
            | Self::MalformedOverride { line, .. } => Some(*line),
            Self::UnknownColor { .. } | Self::PaletteExhausted { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogGraphError>;

/// Toggles consumed by the parser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphOptions {
    /// Derive a fill color for each node from its authors.
    pub color_authors: bool,
    /// Attach file-change lists to nodes as named attributes.
    pub include_files: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            color_authors: true,
            include_files: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct RevisionNodeId(pub usize);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NodeShape {
    #[default]
    Ellipse,
    Rect,
}

impl NodeShape {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ellipse => "ellipse",
            Self::Rect => "rect",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NodeStyle {
    #[default]
    Filled,
}

impl NodeStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filled => "filled",
        }
    }
}

/// File-change blocks of an entry, in the order the log writer emits them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileBlockKind {
    DeletedFiles,
    DeletedDirectories,
    RenamedFiles,
    RenamedDirectories,
    AddedFiles,
    ModifiedFiles,
}

impl FileBlockKind {
    pub const ALL: [Self; 6] = [
        Self::DeletedFiles,
        Self::DeletedDirectories,
        Self::RenamedFiles,
        Self::RenamedDirectories,
        Self::AddedFiles,
        Self::ModifiedFiles,
    ];

    /// Header line introducing the block.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::DeletedFiles => "Deleted files:",
            Self::DeletedDirectories => "Deleted directories:",
            Self::RenamedFiles => "Renamed files:",
            Self::RenamedDirectories => "Renamed directories:",
            Self::AddedFiles => "Added files:",
            Self::ModifiedFiles => "Modified files:",
        }
    }

    /// Attribute name the block is stored under on a node.
    #[must_use]
    pub const fn attribute_name(self) -> &'static str {
        match self {
            Self::DeletedFiles => "Deleted files",
            Self::DeletedDirectories => "Deleted directories",
            Self::RenamedFiles => "Renamed files",
            Self::RenamedDirectories => "Renamed directories",
            Self::AddedFiles => "Added files",
            Self::ModifiedFiles => "Modified files",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::DeletedFiles => 0,
            Self::DeletedDirectories => 1,
            Self::RenamedFiles => 2,
            Self::RenamedDirectories => 3,
            Self::AddedFiles => 4,
            Self::ModifiedFiles => 5,
        }
    }
}

/// Space-joined path lists attached to a node, keyed by block kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FileChanges {
    blocks: [Option<String>; 6],
}

impl FileChanges {
    #[must_use]
    pub fn get(&self, kind: FileBlockKind) -> Option<&str> {
        self.blocks[kind.index()].as_deref()
    }

    pub fn set(&mut self, kind: FileBlockKind, files: String) {
        self.blocks[kind.index()] = Some(files);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Option::is_none)
    }

    /// Present blocks in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (FileBlockKind, &str)> {
        FileBlockKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|files| (kind, files)))
    }
}

/// Initial placement hints for graph editors that read them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NodeGeometry {
    pub border_color: [u8; 3],
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl NodeGeometry {
    /// Stack nodes vertically in creation order.
    #[must_use]
    pub fn stacked(index: usize) -> Self {
        let offset = i32::try_from(index).unwrap_or(i32::MAX / 60).saturating_mul(60);
        Self {
            border_color: [0, 0, 0],
            x: 20,
            y: offset.saturating_add(20),
            width: 20,
            height: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RevisionNode {
    pub id: String,
    pub label: String,
    pub url: String,
    pub shape: Option<NodeShape>,
    pub style: Option<NodeStyle>,
    pub fill_color: Option<String>,
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "FileChanges::is_empty")]
    pub files: FileChanges,
    pub geometry: NodeGeometry,
    /// Line of the node's own `Revision:` header once its entry has been committed.
    pub defined_at: Option<usize>,
}

impl RevisionNode {
    /// A node carrying only the attributes derivable from its identifier.
    #[must_use]
    pub fn placeholder(id: &str, index: usize) -> Self {
        Self {
            id: id.to_string(),
            label: id.chars().take(LABEL_LENGTH).collect(),
            url: format!("#{id}"),
            geometry: NodeGeometry::stacked(index),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.defined_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AncestorEdge {
    pub from: RevisionNodeId,
    pub to: RevisionNodeId,
    pub directed: bool,
    /// Line of the `Ancestor:` header that produced the edge.
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RevisionGraph {
    pub name: String,
    pub nodes: Vec<RevisionNode>,
    pub edges: Vec<AncestorEdge>,
}

impl RevisionGraph {
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn node(&self, id: RevisionNodeId) -> Option<&RevisionNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: RevisionNodeId) -> Option<&mut RevisionNode> {
        self.nodes.get_mut(id.0)
    }

    /// Find a node's index by revision identifier.
    #[must_use]
    pub fn node_id(&self, revision: &str) -> Option<RevisionNodeId> {
        self.nodes
            .iter()
            .position(|node| node.id == revision)
            .map(RevisionNodeId)
    }

    /// Find a node by revision identifier.
    #[must_use]
    pub fn find_node(&self, revision: &str) -> Option<&RevisionNode> {
        self.nodes.iter().find(|node| node.id == revision)
    }

    /// Resolve an edge to its (ancestor, descendant) nodes.
    #[must_use]
    pub fn edge_endpoints(&self, edge: &AncestorEdge) -> Option<(&RevisionNode, &RevisionNode)> {
        Some((self.node(edge.from)?, self.node(edge.to)?))
    }

    /// Nodes referenced as ancestors whose own entry never appeared.
    pub fn placeholders(&self) -> impl Iterator<Item = &RevisionNode> {
        self.nodes.iter().filter(|node| node.is_placeholder())
    }
}
