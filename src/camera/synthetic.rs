//! Headless camera that renders test frames.

use std::num::NonZeroU32;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, trace};

use super::{Camera, CameraInfo};
use crate::config::CameraConfig;
use crate::error::{NivasaError, Result};
use crate::image_ops;

/// Camera that renders a gradient frame per capture and writes it as JPEG.
#[derive(Debug)]
pub struct SyntheticCamera {
    info: CameraInfo,
    quality: u8,
    latency: Duration,
    fail_every: Option<NonZeroU32>,
    frames: AtomicU64,
}

impl SyntheticCamera {
    pub fn new(config: &CameraConfig) -> Self {
        debug!(
            width = config.width,
            height = config.height,
            quality = config.jpeg_quality,
            "Creating synthetic camera"
        );
        Self {
            info: CameraInfo {
                name: "Synthetic Camera".to_string(),
                kind: "synthetic".to_string(),
                width: config.width,
                height: config.height,
            },
            quality: config.jpeg_quality,
            latency: Duration::from_millis(config.latency_ms),
            fail_every: config.fail_every,
            frames: AtomicU64::new(0),
        }
    }

    /// Number of capture attempts so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::SeqCst)
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera for SyntheticCamera {
    fn info(&self) -> &CameraInfo {
        &self.info
    }

    fn capture(&self, target: &Path) -> Result<()> {
        let frame = self.frames.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(frame, path = %target.display(), "Synthetic capture");

        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        if let Some(every) = self.fail_every {
            if frame % u64::from(every.get()) == 0 {
                return Err(NivasaError::capture_failed(format!(
                    "simulated sensor fault on frame {frame}"
                )));
            }
        }

        let img = image_ops::render_frame(self.info.width, self.info.height, frame);
        image_ops::save_jpeg(&img, target, self.quality)
            .map_err(|e| NivasaError::capture_failed(e.to_string()))
    }
}
