//! Capture session: ties the camera, storage, and gallery together.
//!
//! The session is owned by a single coordinating task. A capture runs the
//! blocking camera call on tokio's blocking pool and hands its result back
//! through a oneshot channel; the gallery is only touched when that result
//! is applied with [`CaptureSession::finish_capture`]. At most one capture
//! is in flight at a time.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Local;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::camera::Camera;
use crate::config::NivasaConfig;
use crate::error::{NivasaError, Result};
use crate::gallery::{GalleryStore, GalleryView};
use crate::share::ShareRequest;
use crate::snap::SnapReference;
use crate::storage::{OutputLocation, resolve_output_location};

/// Result delivered by the camera worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(SnapReference),
    Failed(String),
}

/// Handle to an in-flight capture. Resolves to its [`CaptureOutcome`].
#[derive(Debug)]
pub struct PendingCapture {
    rx: oneshot::Receiver<CaptureOutcome>,
    target: PathBuf,
}

impl PendingCapture {
    /// File the camera is writing to.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Future for PendingCapture {
    type Output = CaptureOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|result| {
            result.unwrap_or_else(|_| {
                CaptureOutcome::Failed("capture task ended without a result".to_string())
            })
        })
    }
}

/// Coordinates captures into a rolling gallery.
pub struct CaptureSession<C: Camera + ?Sized> {
    id: Uuid,
    camera: Arc<C>,
    location: OutputLocation,
    gallery: GalleryStore,
    in_flight: bool,
}

impl<C: Camera + ?Sized> CaptureSession<C> {
    pub fn new(camera: Arc<C>, location: OutputLocation, gallery: GalleryStore) -> Self {
        let id = Uuid::new_v4();
        debug!(
            session = %id,
            camera = %camera.info().name,
            dir = %location.dir.display(),
            "Starting capture session"
        );
        Self {
            id,
            camera,
            location,
            gallery,
            in_flight: false,
        }
    }

    /// Build a session from configuration, resolving the output location.
    pub fn from_config(camera: Arc<C>, config: &NivasaConfig) -> Result<Self> {
        let gallery = GalleryStore::new(config.gallery.new_buffer()?);
        let location = resolve_output_location(&config.storage);
        Ok(Self::new(camera, location, gallery))
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub const fn location(&self) -> &OutputLocation {
        &self.location
    }

    pub const fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    /// Observe gallery changes.
    pub fn subscribe(&self) -> watch::Receiver<GalleryView> {
        self.gallery.subscribe()
    }

    pub fn view(&self) -> GalleryView {
        self.gallery.view()
    }

    /// True while a capture is in flight.
    pub const fn is_capturing(&self) -> bool {
        self.in_flight
    }

    /// Start a capture.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// `CaptureInProgress` if a capture is already in flight (the request is
    /// dropped, not queued); `CameraUnavailable` if the camera reports itself
    /// unavailable.
    pub fn begin_capture(&mut self) -> Result<PendingCapture> {
        if self.in_flight {
            debug!(session = %self.id, "Capture already in flight, ignoring request");
            return Err(NivasaError::CaptureInProgress);
        }
        if !self.camera.is_available() {
            let reason = format!("{} is not available", self.camera.info().name);
            self.gallery.record_failure(reason.clone());
            return Err(NivasaError::CameraUnavailable(reason));
        }

        let target = self.location.next_snap_path(Local::now().naive_local());
        trace!(session = %self.id, path = %target.display(), "Requesting capture");

        let (tx, rx) = oneshot::channel();
        let camera = Arc::clone(&self.camera);
        let worker_target = target.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = match camera.capture(&worker_target) {
                Ok(()) => CaptureOutcome::Captured(SnapReference::from_file(&worker_target)),
                Err(e) => CaptureOutcome::Failed(e.into_capture_reason()),
            };
            // The receiver is gone if the session was dropped mid-capture.
            let _ = tx.send(outcome);
        });

        self.in_flight = true;
        Ok(PendingCapture { rx, target })
    }

    /// Apply a capture result to the gallery.
    ///
    /// Only a successful outcome changes the buffer. A failure is published
    /// as the gallery's error state and returned as `CaptureFailed`.
    pub fn finish_capture(&mut self, outcome: CaptureOutcome) -> Result<SnapReference> {
        self.in_flight = false;
        match outcome {
            CaptureOutcome::Captured(snap) => {
                info!(session = %self.id, snap = %snap, "Got snap");
                self.gallery.record_capture(snap.clone());
                Ok(snap)
            }
            CaptureOutcome::Failed(reason) => {
                self.gallery.record_failure(reason.clone());
                Err(NivasaError::capture_failed(reason))
            }
        }
    }

    /// Capture one photo and apply the result.
    pub async fn capture(&mut self) -> Result<SnapReference> {
        let pending = self.begin_capture()?;
        let outcome = pending.await;
        self.finish_capture(outcome)
    }

    /// Everything currently shareable.
    pub fn share_request(&self) -> Result<ShareRequest> {
        ShareRequest::from_view(&self.gallery.view())
    }
}
