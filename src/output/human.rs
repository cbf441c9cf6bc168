//! Human-friendly output implementation using console styles.

use std::path::Path;

use console::Style;
use tracing::{debug, instrument, trace};

use crate::config::LoadedConfig;
use crate::error::NivasaError;
use crate::gallery::{DisplayOrder, GalleryView};
use crate::share::{ShareReceipt, ShareRequest};
use crate::snap::SnapReference;
use crate::storage::{Medium, OutputLocation};
use crate::theme::NivasaTheme;

use super::{Output, snap_label};

/// Gallery grid columns, matching the two-column image grid.
const GRID_COLUMNS: usize = 2;
const CELL_WIDTH: usize = 34;

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    theme: NivasaTheme,
}

impl HumanOutput {
    #[instrument]
    pub fn new(color: bool) -> Self {
        debug!("Creating HumanOutput");
        if !color {
            console::set_colors_enabled(false);
        }
        Self {
            theme: NivasaTheme::default(),
        }
    }

    fn tagged(&self, tag: &str, style: &Style, message: &str) {
        println!("{} {message}", style.apply_to(tag));
    }

    fn field(&self, name: &str, value: &str) {
        println!(
            "  {} {}",
            self.theme.label.apply_to(format!("{name:<10}")),
            self.theme.value.apply_to(value)
        );
    }

    fn cell(&self, slot: usize, snap: &SnapReference) -> String {
        let index = self.theme.slot_index.apply_to(format!("[{slot}]"));
        let (text, style) = if snap.is_placeholder() {
            ("(empty)".to_string(), &self.theme.placeholder)
        } else {
            (snap_label(snap), &self.theme.snap)
        };
        let padded = format!("{text:<width$}", width = CELL_WIDTH - 4);
        format!("{index} {}", style.apply_to(padded))
    }
}

impl Output for HumanOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Outputting success");
        self.tagged("[OK]", &self.theme.success, message);
    }

    #[instrument(skip(self))]
    fn error(&self, error: &NivasaError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        eprintln!("{} {error}", self.theme.error.apply_to("[ERR]"));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            eprintln!(
                "      {} {}",
                self.theme.label.apply_to("Suggestion:"),
                self.theme.muted.apply_to(suggestion)
            );
        }
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Outputting warning");
        self.tagged("[WARN]", &self.theme.warning, message);
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Outputting info");
        self.tagged("[INFO]", &self.theme.accent, message);
    }

    #[instrument(skip(self, view), fields(count = view.count))]
    fn gallery(&self, view: &GalleryView, order: DisplayOrder) {
        debug!("Outputting gallery");
        println!(
            "{} {}",
            self.theme.header.apply_to("Gallery"),
            self.theme
                .muted
                .apply_to(format!("({}/{} captured)", view.count, view.capacity))
        );

        let cells: Vec<String> = view
            .ordered(order)
            .into_iter()
            .enumerate()
            .map(|(i, snap)| self.cell(i + 1, snap))
            .collect();
        for row in cells.chunks(GRID_COLUMNS) {
            println!("  {}", row.join(" "));
        }

        if let Some(failure) = &view.last_error {
            self.warning(&format!(
                "Last capture failed at {}: {}",
                failure.at.format("%H:%M:%S"),
                failure.reason
            ));
        }
    }

    #[instrument(skip(self, snap, view))]
    fn snap_captured(&self, snap: &SnapReference, view: &GalleryView) {
        debug!(snap = %snap, "Outputting capture");
        self.success(&format!(
            "Captured {} ({}/{})",
            snap_label(snap),
            view.count,
            view.capacity
        ));
    }

    #[instrument(skip(self, view))]
    fn capture_failed(&self, error: &NivasaError, view: &GalleryView) {
        debug!(error = %error, "Outputting capture failure");
        self.warning(&format!(
            "{error}; gallery unchanged ({}/{})",
            view.count, view.capacity
        ));
    }

    fn capture_ignored(&self) {
        self.warning("Capture already in progress, tap ignored");
    }

    #[instrument(skip(self, location))]
    fn location(&self, location: &OutputLocation) {
        let medium = match location.medium {
            Medium::External => "external",
            Medium::Internal => "internal",
            Medium::Temporary => "temporary (fallback)",
        };
        debug!(medium, "Outputting location");
        self.field("Directory", &location.dir.display().to_string());
        self.field("Medium", medium);
    }

    #[instrument(skip(self, request, receipt), fields(items = request.len()))]
    fn share_prepared(&self, request: &ShareRequest, receipt: Option<&ShareReceipt>) {
        debug!("Outputting share request");
        println!(
            "{} {}",
            self.theme.header.apply_to(request.title),
            self.theme
                .muted
                .apply_to(format!("({} x {})", request.len(), request.mime_type))
        );
        for item in &request.items {
            let dims = item
                .dimensions
                .map(|(w, h)| format!(" {w}x{h}"))
                .unwrap_or_default();
            println!(
                "  {} {}",
                self.theme.snap.apply_to(&item.uri),
                self.theme.muted.apply_to(dims)
            );
        }
        if let Some(receipt) = receipt {
            self.success(&format!("Shared {} snaps to {}", receipt.items, receipt.target));
        }
    }

    #[instrument(skip(self, loaded))]
    fn config(&self, loaded: &LoadedConfig, path_only: bool) {
        debug!(path = %loaded.path.display(), "Outputting config");
        if path_only {
            println!("{}", loaded.path.display());
            return;
        }
        let state = if loaded.exists { "" } else { " (not found, using defaults)" };
        println!(
            "{} {}{}",
            self.theme.label.apply_to("#"),
            loaded.path.display(),
            self.theme.muted.apply_to(state)
        );
        match loaded.config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => self.error(&e),
        }
    }

    fn config_written(&self, path: &Path) {
        self.success(&format!("Wrote {}", path.display()));
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Outputting version info");
        println!("{}", self.theme.header.apply_to("nivasa"));
        self.field("Version", version);
        if let Some(sha) = git_sha {
            let dirty = matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"));
            let suffix = if dirty { " (dirty)" } else { "" };
            self.field("Git SHA", &format!("{sha}{suffix}"));
        }
        if let Some(time) = build_time {
            self.field("Built", time);
        }
        if let Some(rustc) = option_env!("VERGEN_RUSTC_SEMVER") {
            self.field("Rust", rustc);
        }
        if let Some(target) = option_env!("VERGEN_CARGO_TARGET_TRIPLE") {
            self.field("Target", target);
        }
    }

    #[instrument(skip(self))]
    fn newline(&self) {
        println!();
    }
}
