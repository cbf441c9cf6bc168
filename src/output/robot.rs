//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, error, instrument, trace};

use crate::config::LoadedConfig;
use crate::error::NivasaError;
use crate::gallery::{DisplayOrder, GalleryView};
use crate::share::{ShareReceipt, ShareRequest};
use crate::snap::SnapReference;
use crate::storage::OutputLocation;

use super::{Output, RobotFormat};

/// JSON output implementation for AI agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn serialize<T: Serialize + ?Sized>(data: &T, pretty: bool) -> Option<String> {
        let result = if pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        result
            .inspect_err(|e| error!(error = %e, "JSON serialization failed"))
            .ok()
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let pretty = matches!(self.format, RobotFormat::Json);
        if let Some(json) = Self::serialize(data, pretty) {
            trace!(json_len = json.len(), "JSON serialized");
            println!("{json}");
        }
    }

    /// Output pretty JSON to stderr (errors).
    fn output_json_stderr<T: Serialize>(&self, data: &T) {
        if let Some(json) = Self::serialize(data, true) {
            eprintln!("{json}");
        }
    }
}

/// JSON body shared by every error report.
pub(crate) fn error_json(error: &NivasaError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "message": error.to_string(),
        "suggestion": error.suggestion(),
        "recoverable": error.is_user_recoverable(),
    })
}

impl Output for RobotOutput {
    #[instrument(skip(self))]
    fn success(&self, message: &str) {
        debug!(message, "Robot: success");
        self.output_json(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &NivasaError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&error_json(error));
    }

    #[instrument(skip(self))]
    fn warning(&self, message: &str) {
        debug!(message, "Robot: warning");
        self.output_json(&serde_json::json!({
            "warning": true,
            "message": message
        }));
    }

    #[instrument(skip(self))]
    fn info(&self, message: &str) {
        debug!(message, "Robot: info");
        self.output_json(&serde_json::json!({
            "info": true,
            "message": message
        }));
    }

    #[instrument(skip(self, view), fields(count = view.count, revision = view.revision))]
    fn gallery(&self, view: &GalleryView, order: DisplayOrder) {
        debug!("Robot: gallery");
        self.output_json(&serde_json::json!({
            "gallery": {
                "order": order,
                "snaps": view.ordered(order),
                "count": view.count,
                "capacity": view.capacity,
                "revision": view.revision,
                "last_error": view.last_error,
            }
        }));
    }

    #[instrument(skip(self, snap, view), fields(snap = %snap))]
    fn snap_captured(&self, snap: &SnapReference, view: &GalleryView) {
        debug!("Robot: snap_captured");
        self.output_json(&serde_json::json!({
            "event": "captured",
            "ok": true,
            "snap": snap,
            "count": view.count,
            "capacity": view.capacity,
        }));
    }

    #[instrument(skip(self, view))]
    fn capture_failed(&self, error: &NivasaError, view: &GalleryView) {
        debug!(error = %error, "Robot: capture_failed");
        self.output_json(&serde_json::json!({
            "event": "capture_failed",
            "ok": false,
            "message": error.to_string(),
            "count": view.count,
        }));
    }

    #[instrument(skip(self))]
    fn capture_ignored(&self) {
        debug!("Robot: capture_ignored");
        self.output_json(&serde_json::json!({
            "event": "capture_ignored",
            "ok": false,
            "reason": "capture_in_progress",
        }));
    }

    #[instrument(skip(self, location))]
    fn location(&self, location: &OutputLocation) {
        debug!(dir = %location.dir.display(), "Robot: location");
        self.output_json(location);
    }

    #[instrument(skip(self, request, receipt), fields(items = request.len()))]
    fn share_prepared(&self, request: &ShareRequest, receipt: Option<&ShareReceipt>) {
        debug!("Robot: share_prepared");
        self.output_json(&serde_json::json!({
            "share": request,
            "receipt": receipt,
        }));
    }

    #[instrument(skip(self, loaded))]
    fn config(&self, loaded: &LoadedConfig, path_only: bool) {
        debug!(path = %loaded.path.display(), "Robot: config");
        if path_only {
            self.output_json(&serde_json::json!({
                "path": loaded.path.display().to_string(),
                "source": loaded.source,
                "exists": loaded.exists,
            }));
        } else {
            self.output_json(&serde_json::json!({
                "path": loaded.path.display().to_string(),
                "source": loaded.source,
                "exists": loaded.exists,
                "config": loaded.config,
            }));
        }
    }

    #[instrument(skip(self))]
    fn config_written(&self, path: &Path) {
        debug!("Robot: config_written");
        self.output_json(&serde_json::json!({
            "path": path.display().to_string(),
            "written": true,
        }));
    }

    #[instrument(skip(self))]
    fn version_info(&self, version: &str, git_sha: Option<&str>, build_time: Option<&str>) {
        debug!(version, ?git_sha, ?build_time, "Robot: version_info");
        self.output_json(&serde_json::json!({
            "version": version,
            "git_sha": git_sha,
            "build_time": build_time
        }));
    }

    fn newline(&self) {
        trace!("Robot: newline (no-op)");
    }
}
