//! Configuration file schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{NivasaError, Result};
use crate::gallery::{DEFAULT_CAPACITY, DisplayOrder, RollingBuffer};
use crate::snap::{DEFAULT_PLACEHOLDER_URI, SnapReference};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NivasaConfig {
    pub gallery: GalleryConfig,
    pub storage: StorageConfig,
    pub camera: CameraConfig,
}

/// `[gallery]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Number of snaps kept in the rolling gallery.
    pub capacity: usize,
    /// Locator used for empty slots.
    pub placeholder_uri: String,
    pub display_order: DisplayOrder,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY.get(),
            placeholder_uri: DEFAULT_PLACEHOLDER_URI.to_string(),
            display_order: DisplayOrder::default(),
        }
    }
}

impl GalleryConfig {
    /// Validated capacity.
    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.capacity).ok_or_else(|| {
            NivasaError::ConfigInvalid("gallery.capacity must be at least 1".to_string())
        })
    }

    /// Build an empty buffer of placeholders.
    pub fn new_buffer(&self) -> Result<RollingBuffer> {
        let placeholder = SnapReference::placeholder(self.placeholder_uri.clone());
        Ok(RollingBuffer::with_placeholder(
            self.capacity()?,
            &placeholder,
        ))
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Removable or external pictures directory, used when present and
    /// writable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_dir: Option<PathBuf>,
    /// Fallback directory. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_dir: Option<PathBuf>,
}

/// Largest frame side a JPEG can hold.
pub const MAX_FRAME_SIDE: u32 = 65_535;

/// `[camera]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// Simulated exposure time for the synthetic camera.
    pub latency_ms: u64,
    /// Make every Nth synthetic capture fail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_every: Option<NonZeroU32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            jpeg_quality: 85,
            latency_ms: 0,
            fail_every: None,
        }
    }
}

impl NivasaConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| NivasaError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NivasaError::Other(e.to_string()))
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.gallery.capacity()?;

        if !(1..=100).contains(&self.camera.jpeg_quality) {
            return Err(NivasaError::ConfigInvalid(format!(
                "camera.jpeg_quality must be 1-100, got {}",
                self.camera.jpeg_quality
            )));
        }
        let side = 1..=MAX_FRAME_SIDE;
        if !side.contains(&self.camera.width) || !side.contains(&self.camera.height) {
            return Err(NivasaError::ConfigInvalid(format!(
                "camera frame must be 1-{MAX_FRAME_SIDE} pixels per side, got {}x{}",
                self.camera.width, self.camera.height
            )));
        }
        Ok(())
    }
}
