//! Error types for Nivasa capture and gallery operations.

use thiserror::Error;

/// Primary error type for Nivasa operations.
#[derive(Error, Debug)]
pub enum NivasaError {
    // Capture errors
    #[error("Capture failed: {reason}")]
    CaptureFailed { reason: String },

    #[error("A capture is already in progress")]
    CaptureInProgress,

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    // Share errors
    #[error("Nothing to share: the gallery holds no captured snaps")]
    NothingToShare,

    // Image errors
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl NivasaError {
    /// Build a capture failure from any displayable reason.
    pub fn capture_failed(reason: impl Into<String>) -> Self {
        Self::CaptureFailed {
            reason: reason.into(),
        }
    }

    /// The reason to record for a failed capture, without repeating the
    /// "Capture failed" prefix when the error already carries it.
    pub fn into_capture_reason(self) -> String {
        match self {
            Self::CaptureFailed { reason } => reason,
            other => other.to_string(),
        }
    }

    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CaptureInProgress
                | Self::NothingToShare
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::CaptureInProgress => Some("Wait for the current capture to finish"),
            Self::NothingToShare => Some("Capture a photo first"),
            Self::CameraUnavailable(_) => Some("Check that the camera is connected"),
            Self::ConfigNotFound { .. } => Some("Run: nivasa init"),
            Self::ConfigInvalid(_) => Some("Fix the value in config.toml or run: nivasa init --force"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using NivasaError.
pub type Result<T> = std::result::Result<T, NivasaError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| NivasaError::Other(format!("{}: {e}", f().into())))
    }
}
