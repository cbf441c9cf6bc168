//! Integration tests for the rolling gallery.
//!
//! Drives the gallery store the way a session does and checks the
//! published views.

use std::num::NonZeroUsize;

use nivasa::gallery::{DisplayOrder, GalleryStore, RollingBuffer};
use nivasa::snap::{DEFAULT_PLACEHOLDER_URI, SnapReference};

use crate::common::init_test_logging;

fn snap(n: u32) -> SnapReference {
    SnapReference::captured(format!("content://media/{n}"))
}

fn uris(store: &GalleryStore) -> Vec<String> {
    store
        .view()
        .snaps
        .iter()
        .map(|s| s.uri().to_string())
        .collect()
}

fn distinct_placeholders(capacity: usize) -> RollingBuffer {
    let capacity = NonZeroUsize::new(capacity).unwrap();
    RollingBuffer::new(capacity, |i| {
        SnapReference::placeholder(format!("resource://nivasa/p{}", i + 1))
    })
}

// ===== Eviction =====

#[test]
fn test_five_captures_into_four_slots() {
    init_test_logging();
    let mut store = GalleryStore::new(distinct_placeholders(4));

    assert_eq!(
        uris(&store),
        [
            "resource://nivasa/p1",
            "resource://nivasa/p2",
            "resource://nivasa/p3",
            "resource://nivasa/p4"
        ]
    );

    let evicted = store.record_capture(snap(1));
    assert_eq!(evicted.uri(), "resource://nivasa/p4");
    assert_eq!(
        uris(&store),
        [
            "content://media/1",
            "resource://nivasa/p1",
            "resource://nivasa/p2",
            "resource://nivasa/p3"
        ]
    );

    for n in 2..=4 {
        store.record_capture(snap(n));
    }
    assert_eq!(
        uris(&store),
        [
            "content://media/4",
            "content://media/3",
            "content://media/2",
            "content://media/1"
        ]
    );

    let evicted = store.record_capture(snap(5));
    assert_eq!(evicted, snap(1));
    assert_eq!(
        uris(&store),
        [
            "content://media/5",
            "content://media/4",
            "content://media/3",
            "content://media/2"
        ]
    );
}

#[test]
fn test_length_never_changes() {
    let mut store = GalleryStore::new(distinct_placeholders(3));
    for n in 0..20 {
        store.record_capture(snap(n));
        assert_eq!(store.view().snaps.len(), 3);
    }
}

#[test]
fn test_capacity_one_holds_latest() {
    let mut store = GalleryStore::new(distinct_placeholders(1));
    store.record_capture(snap(1));
    store.record_capture(snap(2));

    let view = store.view();
    assert_eq!(view.snaps, vec![snap(2)]);
    assert_eq!(view.count, 1);
}

// ===== Counting =====

#[test]
fn test_count_tracks_real_snaps() {
    let mut store = GalleryStore::default();
    assert_eq!(store.view().count, 0);

    for expected in 1..=4 {
        store.record_capture(snap(expected));
        assert_eq!(store.view().count, usize::try_from(expected).unwrap());
    }

    // Full: stays at capacity.
    store.record_capture(snap(5));
    assert_eq!(store.view().count, 4);
}

#[test]
fn test_duplicate_uri_is_two_entries() {
    let mut store = GalleryStore::default();
    store.record_capture(snap(1));
    store.record_capture(snap(1));

    let view = store.view();
    assert_eq!(view.count, 2);
    assert_eq!(view.snaps[0], view.snaps[1]);
}

#[test]
fn test_default_placeholders() {
    let view = GalleryStore::default().view();
    assert_eq!(view.capacity, 4);
    assert!(view.snaps.iter().all(SnapReference::is_placeholder));
    assert!(view.snaps.iter().all(|s| s.uri() == DEFAULT_PLACEHOLDER_URI));
}

// ===== Failures and presentation =====

#[test]
fn test_failure_keeps_contents_and_success_clears_error() {
    let mut store = GalleryStore::default();
    store.record_capture(snap(1));
    let before = store.view();

    store.record_failure("lens cap on");
    let failed = store.view();
    assert_eq!(failed.snaps, before.snaps);
    assert_eq!(failed.count, before.count);
    assert_eq!(failed.last_error.as_ref().unwrap().reason, "lens cap on");
    assert!(failed.revision > before.revision);

    store.record_capture(snap(2));
    assert!(store.view().last_error.is_none());
}

#[test]
fn test_oldest_first_is_presentation_only() {
    let mut store = GalleryStore::default();
    for n in 1..=3 {
        store.record_capture(snap(n));
    }
    let view = store.view();

    let oldest_first: Vec<&str> = view
        .ordered(DisplayOrder::OldestFirst)
        .into_iter()
        .map(SnapReference::uri)
        .collect();
    assert_eq!(oldest_first[1..], ["content://media/1", "content://media/2", "content://media/3"]);

    // Canonical order untouched.
    assert_eq!(view.snaps[0], snap(3));
}

#[tokio::test]
async fn test_subscribers_observe_each_publish() {
    let mut store = GalleryStore::default();
    let mut rx = store.subscribe();
    assert_eq!(rx.borrow().revision, 0);

    store.record_capture(snap(1));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().count, 1);

    store.record_failure("busy");
    rx.changed().await.unwrap();
    let view = rx.borrow_and_update().clone();
    assert_eq!(view.count, 1);
    assert!(view.last_error.is_some());
}
