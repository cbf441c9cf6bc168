//! Snap references: opaque locators for captured images and placeholders.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// URI of the default placeholder image.
pub const DEFAULT_PLACEHOLDER_URI: &str = "resource://nivasa/default_image";

const FILE_SCHEME: &str = "file://";

/// Whether a snap is a pre-filled placeholder or a real capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapKind {
    /// Default image filling an empty gallery slot.
    Placeholder,
    /// Image produced by a successful capture.
    Captured,
}

/// Locator of a single image resource.
///
/// Immutable once created. Equality compares both the URI and the kind, so a
/// placeholder never equals a capture that happens to share its locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapReference {
    uri: String,
    kind: SnapKind,
}

impl SnapReference {
    /// Create a placeholder snap.
    pub fn placeholder(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: SnapKind::Placeholder,
        }
    }

    /// Create a captured snap from an arbitrary locator.
    pub fn captured(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            kind: SnapKind::Captured,
        }
    }

    /// Create a captured snap pointing at a file on disk.
    pub fn from_file(path: &Path) -> Self {
        Self::captured(format!("{FILE_SCHEME}{}", path.display()))
    }

    /// The locator string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub const fn kind(&self) -> SnapKind {
        self.kind
    }

    /// The placeholder predicate.
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.kind, SnapKind::Placeholder)
    }

    /// Local file path for captured `file://` snaps.
    pub fn path(&self) -> Option<PathBuf> {
        if self.is_placeholder() {
            return None;
        }
        self.uri.strip_prefix(FILE_SCHEME).map(PathBuf::from)
    }
}

impl Default for SnapReference {
    fn default() -> Self {
        Self::placeholder(DEFAULT_PLACEHOLDER_URI)
    }
}

impl fmt::Display for SnapReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
