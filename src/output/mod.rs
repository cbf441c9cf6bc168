//! Output mode abstraction for robot and human output.

use std::io::{self, IsTerminal};
use std::path::Path;

use crate::cli::Cli;
use crate::config::LoadedConfig;
use crate::error::NivasaError;
use crate::gallery::{DisplayOrder, GalleryView};
use crate::share::{ShareReceipt, ShareRequest};
use crate::snap::SnapReference;
use crate::storage::OutputLocation;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    /// JSON output for AI agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { color: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    ///
    /// Color is disabled by `--no-color` and when stdout is not a terminal.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            Self::Human {
                color: !cli.no_color && io::stdout().is_terminal(),
            }
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { color } => Box::new(HumanOutput::new(color)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &NivasaError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Gallery and capture
    fn gallery(&self, view: &GalleryView, order: DisplayOrder);
    fn snap_captured(&self, snap: &SnapReference, view: &GalleryView);
    fn capture_failed(&self, error: &NivasaError, view: &GalleryView);
    fn capture_ignored(&self);

    // Storage and sharing
    fn location(&self, location: &OutputLocation);
    fn share_prepared(&self, request: &ShareRequest, receipt: Option<&ShareReceipt>);

    // Configuration
    fn config(&self, loaded: &LoadedConfig, path_only: bool);
    fn config_written(&self, path: &Path);

    // Metadata
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>);

    // Visual separators
    fn newline(&self);
}

/// Display name for a snap: file name for files, the URI otherwise.
pub(crate) fn snap_label(snap: &SnapReference) -> String {
    snap.path()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| snap.uri().to_string())
}
