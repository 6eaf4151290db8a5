#![forbid(unsafe_code)]

//! loggraph - turn revision history logs into graph documents.
//!
//! # Commands
//!
//! - `convert`: Parse a log and write it as GXL, DOT, or JSON
//! - `summary`: Report entry, node, and edge counts for a log
//! - `palette`: List the author colors, optionally after overrides

mod config;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lg_core::{AuthorColorTable, GraphOptions, PALETTE};
use lg_parser::{EntryParser, ParseOutcome, parse_author_colors, parse_evidence_json};
use lg_render_dot::{DotRenderConfig, render_dot};
use lg_render_gxl::{GxlRenderConfig, render_gxl_with_config};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{CliConfig, ConvertFlags, ConvertSettings, OutputFormat};

/// loggraph - turn revision history logs into graph documents.
#[derive(Debug, Parser)]
#[command(
    name = "loggraph",
    version,
    about = "loggraph - turn revision history logs into graph documents",
    long_about = "Reads the text log of a revision-control history and builds a directed\n\
        graph with one node per revision and one edge per ancestry link.\n\n\
        Output is GXL by default, with Graphviz DOT and JSON available."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (can be repeated for more detail: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a revision log into a graph document.
    Convert {
        /// Input file path or "-" for stdin. If omitted, reads from stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Output format (default: gxl)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file path. If omitted, writes to stdout.
        #[arg(short, long)]
        output: Option<String>,

        /// Author color overrides, one `author=color` per line
        #[arg(short, long)]
        author_file: Option<PathBuf>,

        /// Do not derive node fill colors from authors
        #[arg(long)]
        no_color_authors: bool,

        /// Attach file change lists to nodes
        #[arg(long)]
        include_files: bool,

        /// Do not attach file change lists, even if the config file asks for them
        #[arg(long, conflicts_with = "include_files")]
        no_include_files: bool,

        /// TOML settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Graph name written to the output document
        #[arg(long)]
        name: Option<String>,

        /// DOT rank direction (TB, BT, LR, RL)
        #[arg(long)]
        rank_dir: Option<String>,

        /// Indent GXL and JSON output
        #[arg(long)]
        pretty: bool,

        /// Compact output, even if the config file asks for indentation
        #[arg(long, conflicts_with = "pretty")]
        no_pretty: bool,

        /// Print run statistics as JSON on stderr
        #[arg(long)]
        json: bool,
    },

    /// Parse a log and report what it contains.
    Summary {
        /// Input file path or "-" for stdin.
        #[arg(default_value = "-")]
        input: String,

        /// Author color overrides, one `author=color` per line
        #[arg(short, long)]
        author_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List the author color palette.
    Palette {
        /// Only colors still free after applying overrides
        #[arg(long)]
        remaining: bool,

        /// Author color overrides, one `author=color` per line
        #[arg(short, long)]
        author_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct ConvertResult {
    format: String,
    graph: String,
    entry_count: usize,
    node_count: usize,
    edge_count: usize,
    placeholder_count: usize,
    author_count: usize,
    output_bytes: usize,
    parse_time_ms: f64,
    render_time_ms: f64,
}

#[derive(Debug, Serialize)]
struct PaletteResult<'a> {
    size: usize,
    assigned: Vec<(&'a str, &'static str)>,
    colors: Vec<&'static str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Convert {
            input,
            format,
            output,
            author_file,
            no_color_authors,
            include_files,
            no_include_files,
            config,
            name,
            rank_dir,
            pretty,
            no_pretty,
            json,
        } => {
            let file_config = match config {
                Some(path) => CliConfig::load(&path)?,
                None => CliConfig::default(),
            };
            let flags = ConvertFlags {
                format,
                author_file,
                no_color_authors,
                include_files,
                no_include_files,
                name,
                rank_dir,
                pretty,
                no_pretty,
            };
            let settings = ConvertSettings::resolve(flags, file_config)?;
            cmd_convert(&input, output.as_deref(), &settings, json)
        }

        Command::Summary {
            input,
            author_file,
            json,
            pretty,
        } => cmd_summary(&input, author_file.as_deref(), json, pretty),

        Command::Palette {
            remaining,
            author_file,
            json,
        } => cmd_palette(remaining, author_file.as_deref(), json),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file = File::open(input).context(format!("Failed to open log: {input}"))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn write_output(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).context(format!("Failed to write to: {path}"))?;
            info!("Wrote output to: {path}");
        }
        None => {
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

/// Build the color table, applying overrides from `author_file` if given.
fn load_color_table(author_file: Option<&Path>, enabled: bool) -> Result<AuthorColorTable> {
    let mut table = AuthorColorTable::new(enabled);
    if let Some(path) = author_file {
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read author file: {}", path.display()))?;
        let overrides = parse_author_colors(&text)
            .context(format!("Invalid author file: {}", path.display()))?;
        table
            .load_overrides(&overrides)
            .context(format!("Invalid author file: {}", path.display()))?;
        debug!(overrides = overrides.len(), path = %path.display(), "loaded author colors");
    }
    Ok(table)
}

fn parse_input(
    input: &str,
    options: GraphOptions,
    author_file: Option<&Path>,
    graph_name: Option<&str>,
) -> Result<ParseOutcome> {
    let colors = load_color_table(author_file, options.color_authors)?;
    let mut parser = EntryParser::new(open_input(input)?, options).with_color_table(colors);
    if let Some(name) = graph_name {
        parser = parser.with_graph_name(name);
    }
    parser
        .parse()
        .context(format!("Failed to parse log: {input}"))
}

// =============================================================================
// Command: convert
// =============================================================================

fn cmd_convert(
    input: &str,
    output: Option<&str>,
    settings: &ConvertSettings,
    json_output: bool,
) -> Result<()> {
    debug!(?settings, "convert settings");

    let parse_start = Instant::now();
    let parsed = parse_input(
        input,
        settings.options,
        settings.author_file.as_deref(),
        Some(settings.graph_name.as_str()),
    )?;
    let parse_time = parse_start.elapsed();

    let render_start = Instant::now();
    let rendered = render_format(&parsed, settings)?;
    let render_time = render_start.elapsed();

    if json_output {
        let result = ConvertResult {
            format: settings.format.as_str().to_string(),
            graph: parsed.graph.name.clone(),
            entry_count: parsed.entries,
            node_count: parsed.graph.nodes.len(),
            edge_count: parsed.graph.edges.len(),
            placeholder_count: parsed.graph.placeholders().count(),
            author_count: parsed.author_colors.len(),
            output_bytes: rendered.len(),
            parse_time_ms: parse_time.as_secs_f64() * 1000.0,
            render_time_ms: render_time.as_secs_f64() * 1000.0,
        };
        eprintln!("{}", serde_json::to_string_pretty(&result)?);
    }

    write_output(output, &rendered)?;

    info!(
        "Converted {} entries into {} nodes, {} edges as {}",
        parsed.entries,
        parsed.graph.nodes.len(),
        parsed.graph.edges.len(),
        settings.format.as_str()
    );
    Ok(())
}

fn render_format(parsed: &ParseOutcome, settings: &ConvertSettings) -> Result<String> {
    Ok(match settings.format {
        OutputFormat::Gxl => render_gxl_with_config(
            &parsed.graph,
            &GxlRenderConfig {
                pretty: settings.pretty,
            },
        ),
        OutputFormat::Dot => render_dot(
            &parsed.graph,
            &DotRenderConfig {
                rank_dir: settings.rank_dir,
                ..DotRenderConfig::default()
            },
        ),
        OutputFormat::Json => {
            let mut json = if settings.pretty {
                serde_json::to_string_pretty(parsed)?
            } else {
                serde_json::to_string(parsed)?
            };
            json.push('\n');
            json
        }
    })
}

// =============================================================================
// Command: summary
// =============================================================================

fn cmd_summary(
    input: &str,
    author_file: Option<&Path>,
    json_output: bool,
    pretty: bool,
) -> Result<()> {
    let parsed = parse_input(input, GraphOptions::default(), author_file, None)?;

    if json_output {
        let evidence = parse_evidence_json(&parsed);
        let output = if pretty {
            let value: serde_json::Value = serde_json::from_str(&evidence)?;
            serde_json::to_string_pretty(&value)?
        } else {
            evidence
        };
        println!("{output}");
        return Ok(());
    }

    let graph = &parsed.graph;
    println!("Graph:        {}", graph.name);
    println!("Entries:      {}", parsed.entries);
    println!("Nodes:        {}", graph.nodes.len());
    println!("Edges:        {}", graph.edges.len());
    println!("Placeholders: {}", graph.placeholders().count());
    println!(
        "Tagged:       {}",
        graph.nodes.iter().filter(|node| !node.tags.is_empty()).count()
    );
    println!("Authors:      {}", parsed.author_colors.len());
    for author in &parsed.author_colors {
        println!("  {} = {}", author.author, author.color);
    }
    Ok(())
}

// =============================================================================
// Command: palette
// =============================================================================

fn cmd_palette(remaining: bool, author_file: Option<&Path>, json_output: bool) -> Result<()> {
    let table = load_color_table(author_file, true)?;
    let colors: Vec<&'static str> = if remaining {
        table.remaining().collect()
    } else {
        PALETTE.to_vec()
    };

    if json_output {
        let result = PaletteResult {
            size: PALETTE.len(),
            assigned: table.assignments().collect(),
            colors,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut out = String::with_capacity(colors.len() * 12);
    for color in colors {
        out.push_str(color);
        out.push('\n');
    }
    write_output(None, &out)
}
