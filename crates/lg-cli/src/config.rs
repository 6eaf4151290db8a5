//! Optional TOML settings for `loggraph convert`.
//!
//! Every key is optional; command-line flags win over file values, which win
//! over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use lg_core::{DEFAULT_GRAPH_NAME, GraphOptions};
use lg_render_dot::RankDir;
use serde::Deserialize;

/// Output format for the convert command.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// GXL graph exchange document
    #[default]
    Gxl,
    /// Graphviz DOT
    Dot,
    /// Parsed graph as JSON
    Json,
}

impl OutputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gxl => "gxl",
            Self::Dot => "dot",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub color_authors: Option<bool>,
    pub include_files: Option<bool>,
    pub author_file: Option<PathBuf>,
    pub graph_name: Option<String>,
    pub format: Option<OutputFormat>,
    pub rank_dir: Option<String>,
    pub pretty: Option<bool>,
}

impl CliConfig {
    /// Read a config file. A relative `author_file` is taken relative to the
    /// config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        if let (Some(author_file), Some(base)) = (&config.author_file, path.parent())
            && author_file.is_relative()
        {
            config.author_file = Some(base.join(author_file));
        }
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Command-line values for `convert`; `None`/`false` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct ConvertFlags {
    pub format: Option<OutputFormat>,
    pub author_file: Option<PathBuf>,
    pub no_color_authors: bool,
    pub include_files: bool,
    pub no_include_files: bool,
    pub name: Option<String>,
    pub rank_dir: Option<String>,
    pub pretty: bool,
    pub no_pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSettings {
    pub options: GraphOptions,
    pub author_file: Option<PathBuf>,
    pub graph_name: String,
    pub format: OutputFormat,
    pub rank_dir: RankDir,
    pub pretty: bool,
}

impl ConvertSettings {
    pub fn resolve(flags: ConvertFlags, config: CliConfig) -> Result<Self> {
        let defaults = GraphOptions::default();
        let color_authors = if flags.no_color_authors {
            false
        } else {
            config.color_authors.unwrap_or(defaults.color_authors)
        };
        let include_files = switch(
            flags.include_files,
            flags.no_include_files,
            config.include_files.unwrap_or(defaults.include_files),
        );

        let rank_dir = match flags.rank_dir.or(config.rank_dir) {
            Some(value) => value.parse::<RankDir>().map_err(anyhow::Error::msg)?,
            None => RankDir::default(),
        };

        Ok(Self {
            options: GraphOptions {
                color_authors,
                include_files,
            },
            author_file: flags.author_file.or(config.author_file),
            graph_name: flags
                .name
                .or(config.graph_name)
                .unwrap_or_else(|| DEFAULT_GRAPH_NAME.to_string()),
            format: flags.format.or(config.format).unwrap_or_default(),
            rank_dir,
            pretty: switch(flags.pretty, flags.no_pretty, config.pretty.unwrap_or(false)),
        })
    }
}

/// An on/off flag pair over a file value; the off flag wins if both are given.
fn switch(on: bool, off: bool, fallback: bool) -> bool {
    !off && (on || fallback)
}
