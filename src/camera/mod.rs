//! Camera abstraction layer.
//!
//! This module provides a trait-based abstraction over the capture
//! collaborator, enabling testability without a physical camera.

pub mod mock;
mod synthetic;

pub use synthetic::SyntheticCamera;

use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Description of a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraInfo {
    /// Human-readable name
    pub name: String,
    /// Implementation kind (e.g. "synthetic", "mock")
    pub kind: String,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Core camera operations trait.
///
/// # Implementation Notes
///
/// - `capture` blocks until the image is fully written to `target`
/// - A failed capture must not leave a snap behind for the caller to record
/// - Implementations are shared across threads; capture runs on a blocking
///   worker while the session keeps serving reads
pub trait Camera: Send + Sync + 'static {
    /// Get camera information.
    fn info(&self) -> &CameraInfo;

    /// Check if the camera can currently take pictures.
    fn is_available(&self) -> bool {
        true
    }

    /// Capture a single photo into `target`.
    ///
    /// # Errors
    ///
    /// Returns `CaptureFailed` or `CameraUnavailable` when no image was
    /// produced.
    fn capture(&self, target: &Path) -> Result<()>;
}
