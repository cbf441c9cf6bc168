//! Rolling gallery of recent captures and its observable state.
//!
//! [`GalleryStore`] owns the [`RollingBuffer`] and is the only thing that
//! mutates it. Every change publishes an immutable [`GalleryView`] on a
//! `tokio::sync::watch` channel; the gallery renderer and the share action
//! subscribe to it and never write back.

mod buffer;

pub use buffer::{DEFAULT_CAPACITY, RollingBuffer};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::snap::SnapReference;

/// Order in which a view presents its snaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayOrder {
    /// Newest capture first.
    #[default]
    RecentFirst,
    /// Oldest capture first.
    OldestFirst,
}

/// Most recent capture failure, kept until the next successful capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFailure {
    pub reason: String,
    pub at: DateTime<Utc>,
}

/// Immutable snapshot of the gallery published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    /// Buffer contents, most recent first.
    pub snaps: Vec<SnapReference>,
    /// Number of real captures among `snaps`.
    pub count: usize,
    pub capacity: usize,
    /// Incremented on every publish.
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<CaptureFailure>,
}

impl GalleryView {
    fn new(buffer: &RollingBuffer, last_error: Option<CaptureFailure>, revision: u64) -> Self {
        Self {
            snaps: buffer.snapshot(),
            count: buffer.count(),
            capacity: buffer.capacity().get(),
            revision,
            last_error,
        }
    }

    /// Snaps arranged for display.
    pub fn ordered(&self, order: DisplayOrder) -> Vec<&SnapReference> {
        match order {
            DisplayOrder::RecentFirst => self.snaps.iter().collect(),
            DisplayOrder::OldestFirst => self.snaps.iter().rev().collect(),
        }
    }

    /// Real captures only, most recent first.
    pub fn real_snaps(&self) -> impl Iterator<Item = &SnapReference> {
        self.snaps.iter().filter(|s| !s.is_placeholder())
    }
}

/// Owner of the rolling buffer.
#[derive(Debug)]
pub struct GalleryStore {
    buffer: RollingBuffer,
    last_error: Option<CaptureFailure>,
    revision: u64,
    tx: watch::Sender<GalleryView>,
}

impl GalleryStore {
    pub fn new(buffer: RollingBuffer) -> Self {
        let (tx, _) = watch::channel(GalleryView::new(&buffer, None, 0));
        Self {
            buffer,
            last_error: None,
            revision: 0,
            tx,
        }
    }

    /// Receive every published view, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<GalleryView> {
        self.tx.subscribe()
    }

    /// The latest published view.
    pub fn view(&self) -> GalleryView {
        self.tx.borrow().clone()
    }

    pub const fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    /// Apply a successful capture and publish. Returns the evicted snap.
    pub fn record_capture(&mut self, snap: SnapReference) -> SnapReference {
        debug!(snap = %snap, "Adding snap to gallery");
        let evicted = self.buffer.record_capture(snap);
        self.last_error = None;
        self.publish();
        evicted
    }

    /// Publish a capture failure. The buffer is left untouched.
    pub fn record_failure(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "Capture failed, gallery unchanged");
        self.last_error = Some(CaptureFailure {
            reason,
            at: Utc::now(),
        });
        self.publish();
    }

    fn publish(&mut self) {
        self.revision += 1;
        let view = GalleryView::new(&self.buffer, self.last_error.clone(), self.revision);
        debug!(
            revision = view.revision,
            count = view.count,
            subscribers = self.tx.receiver_count(),
            "Publishing gallery view"
        );
        self.tx.send_replace(view);
    }
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new(RollingBuffer::default())
    }
}
