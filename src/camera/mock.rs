//! Mock camera implementation for unit testing.
//!
//! This module provides a mock camera that records every capture request
//! and supports error injection and assertions for testing.
//!
//! # Example
//!
//! ```rust,ignore
//! use nivasa::camera::mock::{MockCamera, Operation};
//! use nivasa::camera::Camera;
//!
//! let mock = MockCamera::new();
//! mock.capture(Path::new("/tmp/IMG_1.jpg")).unwrap();
//!
//! mock.assert_operations(&[Operation::Capture {
//!     target: "/tmp/IMG_1.jpg".to_string(),
//! }]);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use super::{Camera, CameraInfo};
use crate::error::{NivasaError, Result};
use crate::image_ops;

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Capture { target: String },
}

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Fail every capture after N successful ones.
    pub fail_after_ops: Option<usize>,
    /// Write a small JPEG to each capture target.
    pub write_files: bool,
    /// Initial connection state.
    pub connected: bool,
}

impl MockConfig {
    /// Create a connected mock configuration.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Default::default()
        }
    }
}

/// Mock camera for testing without a capture device.
pub struct MockCamera {
    info: CameraInfo,
    operation_log: Mutex<Vec<Operation>>,
    captured: Mutex<Vec<PathBuf>>,
    error_injection: Mutex<Option<NivasaError>>,
    config: MockConfig,
    connected: AtomicBool,
}

impl MockCamera {
    #[must_use]
    pub fn new() -> Self {
        debug!("Creating mock camera");
        Self {
            info: CameraInfo {
                name: "Mock Camera".to_string(),
                kind: "mock".to_string(),
                width: 8,
                height: 8,
            },
            operation_log: Mutex::new(Vec::new()),
            captured: Mutex::new(Vec::new()),
            error_injection: Mutex::new(None),
            config: MockConfig::connected(),
            connected: AtomicBool::new(true),
        }
    }

    /// Configure mock behavior.
    #[must_use]
    pub fn with_config(mut self, config: MockConfig) -> Self {
        self.connected.store(config.connected, Ordering::SeqCst);
        self.config = config;
        self
    }

    /// Inject an error for the next capture.
    pub fn inject_error(&self, error: NivasaError) {
        *self.error_injection.lock().unwrap() = Some(error);
    }

    /// Clear injected error.
    pub fn clear_error(&self) {
        *self.error_injection.lock().unwrap() = None;
    }

    /// Set camera as disconnected.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Set camera as connected.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operation_log.lock().unwrap().clone()
    }

    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.operation_log.lock().unwrap().len()
    }

    /// Targets of captures that succeeded, in order.
    #[must_use]
    pub fn captured_paths(&self) -> Vec<PathBuf> {
        self.captured.lock().unwrap().clone()
    }

    /// Assert specific operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[Operation]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(
            ops.is_empty(),
            "Expected no operations, but found: {ops:#?}",
        );
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
        self.captured.lock().unwrap().clear();
    }

    // === Internal Helpers ===

    fn record_op(&self, op: Operation) {
        trace!(?op, "Recording operation");
        self.operation_log.lock().unwrap().push(op);
    }

    fn check_error(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().unwrap().take() {
            return Err(error);
        }

        if !self.connected.load(Ordering::SeqCst) {
            return Err(NivasaError::CameraUnavailable(
                "Mock camera disconnected".to_string(),
            ));
        }

        if let Some(limit) = self.config.fail_after_ops {
            if self.captured.lock().unwrap().len() >= limit {
                return Err(NivasaError::capture_failed("Mock failure after ops limit"));
            }
        }

        Ok(())
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for MockCamera {
    fn info(&self) -> &CameraInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn capture(&self, target: &Path) -> Result<()> {
        self.record_op(Operation::Capture {
            target: target.display().to_string(),
        });
        self.check_error()?;

        if self.config.write_files {
            let frame = self.captured.lock().unwrap().len() as u64;
            let img = image_ops::render_frame(self.info.width, self.info.height, frame);
            image_ops::save_jpeg(&img, target, 75)?;
        }

        self.captured.lock().unwrap().push(target.to_path_buf());
        Ok(())
    }
}

/// Builder for creating `MockCamera` with common configurations.
pub struct MockCameraBuilder {
    config: MockConfig,
}

impl MockCameraBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MockConfig::connected(),
        }
    }

    /// Fail every capture after N successful ones.
    #[must_use]
    pub fn fail_after(mut self, ops: usize) -> Self {
        self.config.fail_after_ops = Some(ops);
        self
    }

    /// Write real JPEG files to capture targets.
    #[must_use]
    pub fn writing_files(mut self) -> Self {
        self.config.write_files = true;
        self
    }

    /// Create camera in disconnected state.
    #[must_use]
    pub fn disconnected(mut self) -> Self {
        self.config.connected = false;
        self
    }

    #[must_use]
    pub fn build(self) -> MockCamera {
        MockCamera::new().with_config(self.config)
    }
}

impl Default for MockCameraBuilder {
    fn default() -> Self {
        Self::new()
    }
}
