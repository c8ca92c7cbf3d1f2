//! Command-line argument definitions for the archgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the description to load, where the graph
//! is written, where the accepted description is stored, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the archgraph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML architecture description. Without it the stored
    /// description (or the built-in default) is rendered.
    #[arg(help = "Path to the input file")]
    pub input: Option<String>,

    /// Path to the output graph JSON file
    #[arg(short, long, default_value = "graph.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the last accepted description
    #[arg(long)]
    pub store: Option<String>,

    /// Reject descriptions with structural problems instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Keep running and re-render whenever the input file changes
    #[arg(short, long, requires = "input")]
    pub watch: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
