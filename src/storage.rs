//! Output location resolution for captured snaps.
//!
//! An external pictures directory is preferred when it is present and
//! writable. Otherwise snaps go to the internal data directory, and as a last
//! resort to the system temp directory, so resolution always yields a usable
//! location.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::config::StorageConfig;

/// Storage medium backing an output location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Medium {
    External,
    Internal,
    Temporary,
}

/// Directory where new snaps are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLocation {
    pub dir: PathBuf,
    pub medium: Medium,
}

impl OutputLocation {
    /// Path for a snap taken at `taken_at`.
    ///
    /// Adds a `_N` suffix when a file with the plain name already exists.
    pub fn next_snap_path(&self, taken_at: NaiveDateTime) -> PathBuf {
        let stem = snap_file_stem(taken_at);
        let first = self.dir.join(format!("{stem}.jpg"));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.dir.join(format!("{stem}_{n}.jpg")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

/// File name stem for a snap: `IMG_yyyyMMdd-HHmmss`.
pub fn snap_file_stem(taken_at: NaiveDateTime) -> String {
    format!("IMG_{}", taken_at.format("%Y%m%d-%H%M%S"))
}

/// Resolve where new snaps go. Never fails.
pub fn resolve_output_location(config: &StorageConfig) -> OutputLocation {
    if let Some(dir) = config.external_dir.as_deref() {
        if is_mounted(dir) {
            debug!(dir = %dir.display(), "Using external storage");
            return OutputLocation {
                dir: dir.to_path_buf(),
                medium: Medium::External,
            };
        }
        debug!(dir = %dir.display(), "External storage not mounted, falling back");
    }

    let internal = config
        .internal_dir
        .clone()
        .unwrap_or_else(default_internal_dir);
    match fs::create_dir_all(&internal).and_then(|()| check_writable(&internal)) {
        Ok(()) => {
            debug!(dir = %internal.display(), "Using internal storage");
            OutputLocation {
                dir: internal,
                medium: Medium::Internal,
            }
        }
        Err(e) => {
            warn!(dir = %internal.display(), error = %e, "Internal storage unusable");
            let temp = std::env::temp_dir().join("nivasa");
            let dir = if fs::create_dir_all(&temp).is_ok() {
                temp
            } else {
                std::env::temp_dir()
            };
            OutputLocation {
                dir,
                medium: Medium::Temporary,
            }
        }
    }
}

/// An existing directory that accepts new files.
fn is_mounted(dir: &Path) -> bool {
    if !fs::metadata(dir).is_ok_and(|meta| meta.is_dir()) {
        return false;
    }
    match check_writable(dir) {
        Ok(()) => true,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "External storage not writable");
            false
        }
    }
}

/// Create and remove a scratch file in `dir`.
///
/// Mode bits alone say nothing about ownership or read-only mounts.
fn check_writable(dir: &Path) -> io::Result<()> {
    let scratch = dir.join(format!(".nivasa-{}.tmp", Uuid::new_v4().simple()));
    trace!(path = %scratch.display(), "Checking writability");
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&scratch)?;
    fs::remove_file(&scratch)
}

fn default_internal_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("nivasa")
        .join("snaps")
}
