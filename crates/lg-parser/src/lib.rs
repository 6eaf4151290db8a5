#![forbid(unsafe_code)]

//! Revision log parsing.
//!
//! The log is a sequence of entries, each introduced by
//! [`lg_core::ENTRY_SEPARATOR`] and laid out as a header, a files section and
//! a change-log section. [`EntryParser`] reads it in one pass and builds a
//! [`RevisionGraph`] with one node per revision and one edge per ancestry link.

mod author_map;
mod builder;
mod cursor;
mod entry_parser;
mod pending;
mod section;

use std::io::BufRead;

use lg_core::{AuthorColor, AuthorColorTable, GraphOptions, Result, RevisionGraph};
use serde::Serialize;
use serde_json::json;

pub use author_map::parse_author_colors;
pub use cursor::LineCursor;
pub use entry_parser::EntryParser;
pub use pending::PendingEntry;
pub use section::Section;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub graph: RevisionGraph,
    /// Every author bound to a color by the end of the run, sorted by author.
    pub author_colors: Vec<AuthorColor>,
    /// Number of entries committed.
    pub entries: usize,
}

/// Parse a complete log held in memory.
pub fn parse_log(input: &str, options: GraphOptions) -> Result<ParseOutcome> {
    EntryParser::new(input.as_bytes(), options).parse()
}

/// Parse a log from any buffered reader with a prepared color table.
pub fn parse_log_reader<R: BufRead>(
    reader: R,
    options: GraphOptions,
    colors: AuthorColorTable,
) -> Result<ParseOutcome> {
    EntryParser::new(reader, options)
        .with_color_table(colors)
        .parse()
}

#[must_use]
pub fn parse_evidence_json(parsed: &ParseOutcome) -> String {
    let placeholders: Vec<&str> = parsed
        .graph
        .placeholders()
        .map(|node| node.id.as_str())
        .collect();
    json!({
        "graph": parsed.graph.name,
        "entry_count": parsed.entries,
        "node_count": parsed.graph.nodes.len(),
        "edge_count": parsed.graph.edges.len(),
        "tagged_count": parsed.graph.nodes.iter().filter(|node| !node.tags.is_empty()).count(),
        "placeholder_count": placeholders.len(),
        "placeholders": placeholders,
        "author_colors": parsed.author_colors,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use lg_core::{
        AuthorColorTable, ENTRY_SEPARATOR, ErrorKind, FileBlockKind, GraphOptions, LogGraphError,
        PALETTE,
    };
    use proptest::prelude::*;

    use super::{parse_evidence_json, parse_log, parse_log_reader};

    fn render_entry(revision: &str, ancestors: &[String], author: &str) -> String {
        let mut out = format!("{ENTRY_SEPARATOR}\nRevision: {revision}\n");
        if ancestors.is_empty() {
            out.push_str("Ancestor: \n");
        }
        for ancestor in ancestors {
            out.push_str(&format!("Ancestor: {ancestor}\n"));
        }
        out.push_str(&format!("Author: {author}\nBranch: main\n\n\nChangeLog: \n\nwork\n"));
        out
    }

    #[test]
    fn single_root_entry() {
        let input = format!(
            "{ENTRY_SEPARATOR}\nRevision: abcd1234ef567890\nAncestor: \nAuthor: alice\n\
             Date: 2020-01-01\nBranch: main\n\n\nChangeLog: \n"
        );
        let outcome = parse_log(&input, GraphOptions::default()).unwrap();
        assert_eq!(outcome.graph.nodes.len(), 1);
        assert!(outcome.graph.edges.is_empty());

        let node = &outcome.graph.nodes[0];
        assert_eq!(node.authors, vec!["alice".to_string()]);
        assert_eq!(node.label, "abcd1234");
        assert_eq!(node.url, "#abcd1234ef567890");
        let tooltip = node.tooltip.as_deref().unwrap();
        assert!(tooltip.contains("2020-01-01"));
        assert!(tooltip.contains("alice"));
    }

    #[test]
    fn ancestor_parsed_first_links_two_nodes() {
        let mut input = render_entry("1111111111", &[], "alice");
        input.push_str(&render_entry("2222222222", &["1111111111".to_string()], "bob"));
        let outcome = parse_log(&input, GraphOptions::default()).unwrap();

        assert_eq!(outcome.graph.nodes.len(), 2);
        assert_eq!(outcome.graph.edges.len(), 1);
        let (from, to) = outcome
            .graph
            .edge_endpoints(&outcome.graph.edges[0])
            .unwrap();
        assert_eq!(from.id, "1111111111");
        assert_eq!(to.id, "2222222222");
    }

    #[test]
    fn forward_reference_is_completed_not_duplicated() {
        let mut input = render_entry("2222222222", &["1111111111".to_string()], "bob");
        input.push_str(&render_entry("1111111111", &[], "alice"));
        let outcome = parse_log(&input, GraphOptions::default()).unwrap();

        assert_eq!(outcome.graph.nodes.len(), 2);
        let ancestor_id = outcome.graph.edges[0].from;
        let ancestor = outcome.graph.node(ancestor_id).unwrap();
        assert_eq!(ancestor.id, "1111111111");
        assert!(!ancestor.is_placeholder());
        assert_eq!(ancestor.authors, vec!["alice".to_string()]);
        assert_eq!(outcome.graph.placeholders().count(), 0);
    }

    #[test]
    fn malformed_ancestor_aborts_the_run() {
        let mut input = render_entry("1111111111", &[], "alice");
        input.push_str(&format!(
            "{ENTRY_SEPARATOR}\nRevision: 2222222222\nAncestorX:foo\nAuthor: bob\nBranch: main\n\n\nChangeLog:\n"
        ));
        let err = parse_log(&input, GraphOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
        let LogGraphError::Mismatch { line, found, .. } = err else {
            panic!("expected a mismatch");
        };
        assert_eq!(line, 13);
        assert_eq!(found, "AncestorX:foo");
    }

    #[test]
    fn file_block_is_consumed_but_not_stored_by_default() {
        let input = format!(
            "{ENTRY_SEPARATOR}\nRevision: 1111111111\nAncestor: \nAuthor: alice\nBranch: main\n\n\
             Added files:\n        src/lib.rs\n\nChangeLog: \n"
        );
        let outcome = parse_log(&input, GraphOptions::default()).unwrap();
        let node = &outcome.graph.nodes[0];
        assert_eq!(node.files.get(FileBlockKind::AddedFiles), None);
        assert!(node.files.is_empty());
    }

    #[test]
    fn too_many_authors_exhaust_the_palette() {
        let mut colors = AuthorColorTable::new(true);
        let reserved: Vec<_> = PALETTE
            .iter()
            .skip(1)
            .enumerate()
            .map(|(index, color)| lg_core::AuthorColor::new(format!("reserved{index}"), *color))
            .collect();
        colors.load_overrides(&reserved).unwrap();
        assert_eq!(colors.remaining_len(), 1);

        let mut input = render_entry("1111111111", &[], "alice");
        input.push_str(&render_entry("2222222222", &["1111111111".to_string()], "bob"));
        let err = parse_log_reader(input.as_bytes(), GraphOptions::default(), colors).unwrap_err();
        assert!(matches!(
            err,
            LogGraphError::PaletteExhausted { ref author, .. } if author == "bob"
        ));
    }

    #[test]
    fn evidence_json_reports_counts() {
        let input = render_entry("2222222222", &["1111111111".to_string()], "bob");
        let outcome = parse_log(&input, GraphOptions::default()).unwrap();
        let evidence = parse_evidence_json(&outcome);
        assert!(evidence.contains("\"node_count\":2"));
        assert!(evidence.contains("\"edge_count\":1"));
        assert!(evidence.contains("\"placeholder_count\":1"));
        assert!(evidence.contains("\"placeholders\":[\"1111111111\"]"));
    }

    fn history() -> impl Strategy<Value = Vec<(usize, Vec<usize>, usize)>> {
        prop::collection::vec(
            (0..12_usize, prop::collection::vec(0..12_usize, 0..3), 0..5_usize),
            0..10,
        )
    }

    fn revision(index: usize) -> String {
        format!("{index:040x}")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_nodes_match_referenced_identifiers(entries in history()) {
            let mut seen = BTreeSet::new();
            let mut input = String::new();
            let mut expected_edges = 0;
            let mut referenced = BTreeSet::new();
            for (rev, ancestors, author) in &entries {
                // Each revision gets at most one entry.
                if !seen.insert(*rev) {
                    continue;
                }
                let ancestors: Vec<String> = ancestors.iter().map(|a| revision(*a)).collect();
                referenced.insert(revision(*rev));
                referenced.extend(ancestors.iter().cloned());
                expected_edges += ancestors.len();
                input.push_str(&render_entry(&revision(*rev), &ancestors, &format!("author{author}")));
            }

            let outcome = parse_log(&input, GraphOptions::default()).unwrap();
            let ids: BTreeSet<String> = outcome.graph.nodes.iter().map(|n| n.id.clone()).collect();
            prop_assert_eq!(ids.len(), outcome.graph.nodes.len());
            prop_assert_eq!(ids, referenced);
            prop_assert_eq!(outcome.graph.edges.len(), expected_edges);
            for edge in &outcome.graph.edges {
                prop_assert!(outcome.graph.edge_endpoints(edge).is_some());
                prop_assert!(edge.directed);
            }
        }

        #[test]
        fn prop_color_assignment_is_deterministic(entries in history()) {
            let mut input = String::new();
            let mut seen = BTreeSet::new();
            for (rev, _, author) in &entries {
                if seen.insert(*rev) {
                    input.push_str(&render_entry(&revision(*rev), &[], &format!("author{author}")));
                }
            }
            let first = parse_log(&input, GraphOptions::default()).unwrap();
            let second = parse_log(&input, GraphOptions::default()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_arbitrary_text_never_panics(input in ".{0,200}") {
            let _ = parse_log(&input, GraphOptions::default());
        }
    }
}
