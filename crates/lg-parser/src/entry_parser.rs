use std::io::BufRead;

use lg_core::{
    AuthorColorTable, DEFAULT_GRAPH_NAME, ENTRY_SEPARATOR, FileBlockKind, GraphOptions,
    LogGraphError, Result,
};
use tracing::{debug, info, trace};

use crate::ParseOutcome;
use crate::builder::GraphBuilder;
use crate::cursor::LineCursor;
use crate::pending::PendingEntry;
use crate::section::{CHANGELOG_TERMINATOR, FILE_INDENT, REVISION, Section};

/// Single-pass reader turning a revision log into a [`lg_core::RevisionGraph`].
pub struct EntryParser<R> {
    cursor: LineCursor<R>,
    builder: GraphBuilder,
}

impl<R: BufRead> EntryParser<R> {
    pub fn new(reader: R, options: GraphOptions) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            builder: GraphBuilder::new(
                DEFAULT_GRAPH_NAME.to_string(),
                options,
                AuthorColorTable::new(options.color_authors),
            ),
        }
    }

    /// Use a prepared color table, typically one seeded with overrides.
    #[must_use]
    pub fn with_color_table(mut self, colors: AuthorColorTable) -> Self {
        self.builder.set_colors(colors);
        self
    }

    #[must_use]
    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.builder.set_name(name.into());
        self
    }

    /// Consume the whole stream. The first malformed line aborts the run.
    pub fn parse(mut self) -> Result<ParseOutcome> {
        while let Some(line) = self.cursor.next_line()? {
            if line != ENTRY_SEPARATOR {
                return Err(LogGraphError::Mismatch {
                    line: self.cursor.line_number(),
                    expected: ENTRY_SEPARATOR.to_string(),
                    found: line,
                });
            }
            self.parse_entry()?;
        }

        info!(
            nodes = self.builder.node_count(),
            edges = self.builder.edge_count(),
            lines = self.cursor.line_number(),
            "parsed revision log"
        );
        Ok(self.builder.finish())
    }

    fn parse_entry(&mut self) -> Result<()> {
        let line = self.expect_line(REVISION, None)?;
        let revision = header_value(&line, REVISION);
        if revision.trim().is_empty() {
            return Err(LogGraphError::Mismatch {
                line: self.cursor.line_number(),
                expected: format!("{REVISION} <id>"),
                found: line,
            });
        }
        let mut entry = self
            .builder
            .begin_entry(&revision, self.cursor.line_number());

        let mut previous = Section::Revision;
        let mut section = previous.next(self.cursor.peek()?);
        while section != Section::Done {
            trace!(?section, line = self.cursor.line_number() + 1, "entering section");
            self.parse_section(section, previous, &mut entry)?;
            previous = section;
            section = section.next(self.cursor.peek()?);
        }

        self.builder.commit(entry);
        Ok(())
    }

    fn parse_section(
        &mut self,
        section: Section,
        previous: Section,
        entry: &mut PendingEntry,
    ) -> Result<()> {
        match section {
            Section::Ancestor => {
                let ancestor = self.expect_value(section, previous)?;
                if !ancestor.is_empty() {
                    let from = self.builder.intern_node(&ancestor);
                    self.builder
                        .push_edge(from, entry.node(), self.cursor.line_number());
                }
            }
            Section::Author => {
                let author = self.expect_value(section, previous)?;
                if !author.is_empty() {
                    let color = self.builder.assign_color(&author)?;
                    entry.push_author(author, color);
                }
            }
            Section::Date => {
                let date = self.expect_value(section, previous)?;
                entry.push_date(date);
            }
            Section::Branch => {
                let branch = self.expect_value(section, previous)?;
                if !branch.is_empty() {
                    entry.push_branch(branch);
                }
            }
            Section::Tag => {
                let tag = self.expect_value(section, previous)?;
                if !tag.is_empty() {
                    entry.push_tag(tag);
                }
            }
            Section::FileBlock(kind) => {
                self.expect_line(kind.header(), Some(previous))?;
                let files = self.read_file_block()?;
                self.store_files(kind, files, entry);
            }
            Section::FilesBlank | Section::ChangeLogBlank => {
                self.expect_blank(previous)?;
            }
            Section::ChangeLogMarker => {
                self.expect_line(section.requirement(), Some(previous))?;
            }
            Section::ChangeLogBody => self.skip_change_log()?,
            Section::Revision | Section::Done => {}
        }
        Ok(())
    }

    /// Read a mandatory line that must start with `prefix`.
    ///
    /// `previous` is the section the grammar just left; its alternatives are
    /// reported alongside `prefix` on a mismatch.
    fn expect_line(&mut self, prefix: &str, previous: Option<Section>) -> Result<String> {
        let Some(line) = self.cursor.next_line()? else {
            return Err(LogGraphError::UnexpectedEof {
                line: self.cursor.line_number(),
            });
        };
        if !line.starts_with(prefix) {
            return Err(LogGraphError::Mismatch {
                line: self.cursor.line_number(),
                expected: previous.map_or_else(|| prefix.to_string(), Section::expected_after),
                found: line,
            });
        }
        Ok(line)
    }

    fn expect_value(&mut self, section: Section, previous: Section) -> Result<String> {
        let prefix = section.requirement();
        let line = self.expect_line(prefix, Some(previous))?;
        Ok(header_value(&line, prefix))
    }

    fn expect_blank(&mut self, previous: Section) -> Result<()> {
        let Some(line) = self.cursor.next_line()? else {
            return Err(LogGraphError::UnexpectedEof {
                line: self.cursor.line_number(),
            });
        };
        if !line.is_empty() {
            return Err(LogGraphError::Mismatch {
                line: self.cursor.line_number(),
                expected: previous.expected_after(),
                found: line,
            });
        }
        Ok(())
    }

    /// Collect indented continuation lines into one space-joined list.
    fn read_file_block(&mut self) -> Result<String> {
        let mut files: Vec<String> = Vec::new();
        while self.cursor.next_starts_with(FILE_INDENT)? {
            let Some(line) = self.cursor.next_line()? else {
                break;
            };
            let paths = line[FILE_INDENT.len()..].trim();
            if !paths.is_empty() {
                files.push(paths.to_string());
            }
        }
        Ok(files.join(" "))
    }

    fn store_files(&mut self, kind: FileBlockKind, files: String, entry: &mut PendingEntry) {
        if self.builder.options().include_files {
            entry.set_files(kind, files);
        } else {
            trace!(block = kind.header(), "dropping file block");
        }
    }

    /// Discard change-log text up to the next separator or end of stream.
    fn skip_change_log(&mut self) -> Result<()> {
        let mut skipped = 0_usize;
        loop {
            let stop = match self.cursor.peek()? {
                None => true,
                Some(line) => line.starts_with(CHANGELOG_TERMINATOR),
            };
            if stop {
                break;
            }
            self.cursor.next_line()?;
            skipped += 1;
        }
        debug!(skipped, "skipped change log");
        Ok(())
    }
}

/// Text after `prefix`, minus the single space the log writer puts there.
fn header_value(line: &str, prefix: &str) -> String {
    let rest = line.get(prefix.len()..).unwrap_or_default();
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}
