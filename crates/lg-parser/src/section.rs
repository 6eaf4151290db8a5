//! Fixed section order of one log entry.
//!
//! Each section names the sections that may follow it when their prefix
//! starts the next line, and the section entered when none does. Order only
//! moves forward; a section may repeat itself.

use lg_core::FileBlockKind;

pub const REVISION: &str = "Revision:";
pub const ANCESTOR: &str = "Ancestor:";
pub const AUTHOR: &str = "Author:";
pub const DATE: &str = "Date:";
pub const BRANCH: &str = "Branch:";
pub const TAG: &str = "Tag:";
pub const CHANGELOG: &str = "ChangeLog:";

/// Leading run of a separator line that ends a change-log body.
pub const CHANGELOG_TERMINATOR: &str = "----";

/// Stand-in for the prefix of a section that must be an empty line.
pub const BLANK_LINE: &str = "<blank line>";

/// Indent marking a continuation line of a file block.
pub const FILE_INDENT: &str = "        ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Revision,
    Ancestor,
    Author,
    Date,
    Branch,
    Tag,
    FilesBlank,
    FileBlock(FileBlockKind),
    ChangeLogBlank,
    ChangeLogMarker,
    ChangeLogBody,
    Done,
}

use FileBlockKind::{
    AddedFiles, DeletedDirectories, DeletedFiles, ModifiedFiles, RenamedDirectories, RenamedFiles,
};
use Section::FileBlock;

const ALL_FILE_BLOCKS: &[Section] = &[
    FileBlock(DeletedFiles),
    FileBlock(DeletedDirectories),
    FileBlock(RenamedFiles),
    FileBlock(RenamedDirectories),
    FileBlock(AddedFiles),
    FileBlock(ModifiedFiles),
];

impl Section {
    /// Line prefix that introduces the section, if it has one.
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Revision => Some(REVISION),
            Self::Ancestor => Some(ANCESTOR),
            Self::Author => Some(AUTHOR),
            Self::Date => Some(DATE),
            Self::Branch => Some(BRANCH),
            Self::Tag => Some(TAG),
            Self::FileBlock(kind) => Some(kind.header()),
            Self::ChangeLogMarker => Some(CHANGELOG),
            Self::FilesBlank | Self::ChangeLogBlank | Self::ChangeLogBody | Self::Done => None,
        }
    }

    /// Sections entered instead of [`Self::fallback`] when their prefix starts the next line.
    #[must_use]
    pub const fn lookahead(self) -> &'static [Self] {
        match self {
            Self::Revision | Self::Ancestor => &[Self::Ancestor],
            Self::Author => &[Self::Author, Self::Date],
            Self::Date => &[Self::Date],
            Self::Branch => &[Self::Branch, Self::Tag],
            Self::Tag => &[Self::Tag],
            Self::FilesBlank => ALL_FILE_BLOCKS,
            Self::FileBlock(kind) => file_blocks_after(kind),
            Self::ChangeLogBlank | Self::ChangeLogMarker | Self::ChangeLogBody | Self::Done => &[],
        }
    }

    /// Section entered when nothing in [`Self::lookahead`] matches.
    #[must_use]
    pub const fn fallback(self) -> Self {
        match self {
            Self::Revision | Self::Ancestor => Self::Author,
            Self::Author | Self::Date => Self::Branch,
            Self::Branch | Self::Tag => Self::FilesBlank,
            Self::FilesBlank | Self::FileBlock(_) => Self::ChangeLogBlank,
            Self::ChangeLogBlank => Self::ChangeLogMarker,
            Self::ChangeLogMarker => Self::ChangeLogBody,
            Self::ChangeLogBody | Self::Done => Self::Done,
        }
    }

    /// Position in the entry grammar; file blocks are ordered among themselves.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::Revision => 0,
            Self::Ancestor => 1,
            Self::Author => 2,
            Self::Date => 3,
            Self::Branch => 4,
            Self::Tag => 5,
            Self::FilesBlank => 6,
            Self::FileBlock(kind) => 7 + kind.index(),
            Self::ChangeLogBlank => 13,
            Self::ChangeLogMarker => 14,
            Self::ChangeLogBody => 15,
            Self::Done => 16,
        }
    }

    /// What a mandatory line must look like; blank sections have no prefix.
    #[must_use]
    pub const fn requirement(self) -> &'static str {
        match self.prefix() {
            Some(prefix) => prefix,
            None => BLANK_LINE,
        }
    }

    /// Everything that would have been accepted on the line after `self`,
    /// for diagnostics once the fallback section rejects it.
    #[must_use]
    pub fn expected_after(self) -> String {
        let mut expected: Vec<&str> = self
            .lookahead()
            .iter()
            .filter_map(|candidate| candidate.prefix())
            .collect();
        let fallback = self.fallback().requirement();
        if !expected.contains(&fallback) {
            expected.push(fallback);
        }
        expected.join(" | ")
    }

    /// Pick the next section given the upcoming line.
    #[must_use]
    pub fn next(self, upcoming: Option<&str>) -> Self {
        let Some(line) = upcoming else {
            return self.fallback();
        };
        self.lookahead()
            .iter()
            .copied()
            .find(|candidate| {
                candidate
                    .prefix()
                    .is_some_and(|prefix| line.starts_with(prefix))
            })
            .unwrap_or_else(|| self.fallback())
    }
}

const fn file_blocks_after(kind: FileBlockKind) -> &'static [Section] {
    match kind {
        DeletedFiles => &[
            FileBlock(DeletedDirectories),
            FileBlock(RenamedFiles),
            FileBlock(RenamedDirectories),
            FileBlock(AddedFiles),
            FileBlock(ModifiedFiles),
        ],
        DeletedDirectories => &[
            FileBlock(RenamedFiles),
            FileBlock(RenamedDirectories),
            FileBlock(AddedFiles),
            FileBlock(ModifiedFiles),
        ],
        RenamedFiles => &[
            FileBlock(RenamedDirectories),
            FileBlock(AddedFiles),
            FileBlock(ModifiedFiles),
        ],
        RenamedDirectories => &[FileBlock(AddedFiles), FileBlock(ModifiedFiles)],
        AddedFiles => &[FileBlock(ModifiedFiles)],
        ModifiedFiles => &[],
    }
}
