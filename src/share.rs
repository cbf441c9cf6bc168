//! Sharing captured snaps with an external "send multiple images" target.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{NivasaError, Result, ResultExt};
use crate::gallery::GalleryView;
use crate::image_ops;

pub const SHARE_ACTION: &str = "send_multiple";
pub const SHARE_MIME_TYPE: &str = "image/jpeg";
pub const SHARE_TITLE: &str = "Send images";

/// One image in a share request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareItem {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// (width, height) when the file could be probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

/// Request handed to a [`ShareTarget`].
#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest {
    pub action: &'static str,
    pub mime_type: &'static str,
    pub title: &'static str,
    pub created_at: DateTime<Utc>,
    /// Real captures, most recent first.
    pub items: Vec<ShareItem>,
}

impl ShareRequest {
    /// Collect every real capture in `view`.
    ///
    /// # Errors
    ///
    /// `NothingToShare` when the gallery holds only placeholders.
    pub fn from_view(view: &GalleryView) -> Result<Self> {
        let items: Vec<ShareItem> = view
            .real_snaps()
            .map(|snap| {
                let path = snap.path();
                let dimensions = path
                    .as_deref()
                    .and_then(|p| image_ops::image_dimensions(p).ok());
                ShareItem {
                    uri: snap.uri().to_string(),
                    path,
                    dimensions,
                }
            })
            .collect();

        if items.is_empty() {
            return Err(NivasaError::NothingToShare);
        }
        debug!(items = items.len(), "Prepared share request");

        Ok(Self {
            action: SHARE_ACTION,
            mime_type: SHARE_MIME_TYPE,
            title: SHARE_TITLE,
            created_at: Utc::now(),
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a share target did with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareReceipt {
    /// Where the request went (file path, intent name, ...).
    pub target: String,
    pub items: usize,
}

/// Receiver of share requests.
pub trait ShareTarget {
    fn share(&self, request: &ShareRequest) -> Result<ShareReceipt>;
}

/// Share target that writes each request as a JSON manifest.
#[derive(Debug, Clone)]
pub struct ManifestShare {
    dir: PathBuf,
}

impl ManifestShare {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self, request: &ShareRequest) -> PathBuf {
        let suffix = Uuid::new_v4().simple().to_string();
        self.dir.join(format!(
            "share-{}-{}.json",
            request.created_at.format("%Y%m%d-%H%M%S"),
            &suffix[..8]
        ))
    }
}

impl ShareTarget for ManifestShare {
    fn share(&self, request: &ShareRequest) -> Result<ShareReceipt> {
        fs::create_dir_all(&self.dir)?;
        let path = self.manifest_path(request);
        let json = serde_json::to_string_pretty(request)
            .with_context(|| "Failed to serialize share request")?;
        fs::write(&path, json)?;
        info!(path = %path.display(), items = request.len(), "Wrote share manifest");
        Ok(ShareReceipt {
            target: path.display().to_string(),
            items: request.len(),
        })
    }
}
