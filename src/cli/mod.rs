//! CLI argument definitions and command dispatch.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::gallery::DisplayOrder;

/// Nivasa - rolling capture buffer that keeps your most recent snaps.
///
/// Robot Mode: Use --robot or --format json for machine-parseable output optimized for AI agents.
#[derive(Parser, Debug)]
#[command(name = "nivasa", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "NIVASA_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json (optimized for AI agents)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file to use instead of `NIVASA_CONFIG` or the default location
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Order used when listing the gallery (overrides config)
    #[arg(long, global = true, value_enum)]
    pub order: Option<DisplayOrder>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Capturing ===
    /// Take one or more photos and show the resulting gallery
    #[command(visible_alias = "snap")]
    Capture(CaptureArgs),

    /// Interactive capture session reading commands from stdin
    Session(SessionArgs),

    /// Show where new snaps will be stored
    Where,

    // === Configuration ===
    /// Write a default configuration file
    Init(InitArgs),

    /// Show current configuration
    Config(ConfigArgs),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

/// Arguments for one-shot captures.
///
/// # Examples
///
/// ```bash
/// # Take a single photo
/// nivasa capture
///
/// # Fill the gallery and write a share manifest
/// nivasa capture --count 4 --share-dir ~/outbox
/// ```
#[derive(Parser, Debug)]
pub struct CaptureArgs {
    /// Number of photos to take, one after another
    #[arg(long, short = 'n', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Share the resulting gallery by writing a manifest into this directory
    #[arg(long, value_name = "DIR")]
    pub share_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SessionArgs {
    /// Directory for share manifests written by the `share` command
    #[arg(long, value_name = "DIR")]
    pub share_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show configuration file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
