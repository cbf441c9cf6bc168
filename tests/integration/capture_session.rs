//! Integration tests for capture sessions.
//!
//! Uses the mock and synthetic cameras against temporary storage.

use std::num::NonZeroU32;
use std::sync::Arc;

use nivasa::camera::mock::{MockCamera, MockCameraBuilder, Operation};
use nivasa::camera::SyntheticCamera;
use nivasa::config::{CameraConfig, NivasaConfig};
use nivasa::error::NivasaError;
use nivasa::session::{CaptureOutcome, CaptureSession};
use nivasa::storage::Medium;
use tempfile::TempDir;

use crate::common::init_test_logging;

fn config_in(dir: &TempDir) -> NivasaConfig {
    let mut config = NivasaConfig::default();
    config.storage.internal_dir = Some(dir.path().join("snaps"));
    config.camera = CameraConfig {
        width: 32,
        height: 24,
        ..CameraConfig::default()
    };
    config
}

fn mock_session(camera: MockCamera) -> (CaptureSession<MockCamera>, TempDir) {
    let dir = TempDir::new().unwrap();
    let session = CaptureSession::from_config(Arc::new(camera), &config_in(&dir)).unwrap();
    (session, dir)
}

// ===== Happy path =====

#[tokio::test]
async fn test_session_uses_internal_storage() {
    init_test_logging();
    let (session, dir) = mock_session(MockCamera::new());

    assert_eq!(session.location().medium, Medium::Internal);
    assert_eq!(session.location().dir, dir.path().join("snaps"));
    assert!(session.location().dir.is_dir());
}

#[tokio::test]
async fn test_five_captures_keep_four_newest() {
    init_test_logging();
    let (mut session, _dir) = mock_session(MockCameraBuilder::new().writing_files().build());

    let mut taken = Vec::new();
    for _ in 0..5 {
        taken.push(session.capture().await.unwrap());
    }

    let view = session.view();
    assert_eq!(view.count, 4);
    let expected: Vec<_> = taken.iter().rev().take(4).cloned().collect();
    assert_eq!(view.snaps, expected);
    assert_eq!(session.camera().operation_count(), 5);
}

#[tokio::test]
async fn test_synthetic_camera_writes_real_files() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let camera = Arc::new(SyntheticCamera::new(&config.camera));
    let mut session = CaptureSession::from_config(camera, &config).unwrap();

    let first = session.capture().await.unwrap();
    let second = session.capture().await.unwrap();

    assert_ne!(first, second);
    let path = first.path().unwrap();
    assert!(path.is_file());
    assert_eq!(path.extension().unwrap(), "jpg");
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("IMG_")
    );
    assert_eq!(nivasa::image_ops::image_dimensions(&path).unwrap(), (32, 24));
    assert_eq!(session.camera().frames(), 2);
}

// ===== Failures =====

#[tokio::test]
async fn test_failures_after_limit_leave_gallery() {
    let (mut session, _dir) = mock_session(MockCameraBuilder::new().fail_after(2).build());

    session.capture().await.unwrap();
    session.capture().await.unwrap();
    let before = session.view();

    let err = session.capture().await.unwrap_err();
    assert!(matches!(err, NivasaError::CaptureFailed { .. }));

    let after = session.view();
    assert_eq!(after.snaps, before.snaps);
    assert_eq!(after.count, 2);
    assert!(after.last_error.is_some());
}

#[tokio::test]
async fn test_synthetic_fault_every_other_frame() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.camera.fail_every = NonZeroU32::new(2);
    let camera = Arc::new(SyntheticCamera::new(&config.camera));
    let mut session = CaptureSession::from_config(camera, &config).unwrap();

    assert!(session.capture().await.is_ok());
    let err = session.capture().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Capture failed: simulated sensor fault on frame 2"
    );
    assert!(session.capture().await.is_ok());

    assert_eq!(session.view().count, 2);
}

#[tokio::test]
async fn test_recovery_after_reconnect() {
    let (mut session, _dir) = mock_session(MockCamera::new());
    session.camera().disconnect();

    assert!(matches!(
        session.begin_capture(),
        Err(NivasaError::CameraUnavailable(_))
    ));

    session.camera().reconnect();
    session.capture().await.unwrap();

    let view = session.view();
    assert_eq!(view.count, 1);
    assert!(view.last_error.is_none());
}

// ===== Concurrency =====

#[tokio::test]
async fn test_double_tap_starts_one_capture() {
    let (mut session, _dir) = mock_session(MockCamera::new());

    let pending = session.begin_capture().unwrap();
    let target = pending.target().display().to_string();
    for _ in 0..3 {
        assert!(matches!(
            session.begin_capture(),
            Err(NivasaError::CaptureInProgress)
        ));
    }

    let outcome = pending.await;
    assert!(matches!(outcome, CaptureOutcome::Captured(_)));
    session.finish_capture(outcome).unwrap();

    session
        .camera()
        .assert_operations(&[Operation::Capture { target }]);
    assert_eq!(session.view().count, 1);
}

#[tokio::test]
async fn test_reads_during_capture_see_previous_view() {
    let (mut session, _dir) = mock_session(MockCamera::new());
    let rx = session.subscribe();

    let pending = session.begin_capture().unwrap();
    // Nothing applied until the outcome is.
    assert_eq!(rx.borrow().count, 0);
    assert_eq!(session.view().count, 0);

    let outcome = pending.await;
    session.finish_capture(outcome).unwrap();
    assert_eq!(rx.borrow().count, 1);
}

#[tokio::test]
async fn test_share_request_from_session() {
    let (mut session, _dir) = mock_session(MockCameraBuilder::new().writing_files().build());

    assert!(matches!(
        session.share_request(),
        Err(NivasaError::NothingToShare)
    ));

    let snap = session.capture().await.unwrap();
    let request = session.share_request().unwrap();
    assert_eq!(request.len(), 1);
    assert_eq!(request.items[0].uri, snap.uri());
    assert_eq!(request.items[0].dimensions, Some((8, 8)));
}
