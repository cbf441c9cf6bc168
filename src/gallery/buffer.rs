//! Fixed-capacity rolling buffer of recent snaps.
//!
//! Entries are kept most-recent-first: index 0 is the newest capture and the
//! back of the buffer is the next entry to be evicted.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use tracing::trace;

use crate::snap::SnapReference;

/// Gallery capacity used when none is configured.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(4).unwrap();

/// Ordered sequence of exactly `capacity` snaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingBuffer {
    entries: VecDeque<SnapReference>,
    capacity: NonZeroUsize,
}

impl RollingBuffer {
    /// Create a buffer pre-filled with placeholders.
    ///
    /// `placeholder` receives the slot index, front to back.
    pub fn new<F>(capacity: NonZeroUsize, placeholder: F) -> Self
    where
        F: FnMut(usize) -> SnapReference,
    {
        let entries: VecDeque<_> = (0..capacity.get()).map(placeholder).collect();
        trace!(capacity = capacity.get(), "Initialized rolling buffer");
        Self { entries, capacity }
    }

    /// Create a buffer where every slot holds a clone of `placeholder`.
    pub fn with_placeholder(capacity: NonZeroUsize, placeholder: &SnapReference) -> Self {
        Self::new(capacity, |_| placeholder.clone())
    }

    pub const fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Insert `snap` as the most recent entry and evict the oldest.
    ///
    /// Returns the evicted entry. Length is unchanged.
    pub fn record_capture(&mut self, snap: SnapReference) -> SnapReference {
        self.entries.push_front(snap);
        let evicted = self
            .entries
            .pop_back()
            .unwrap_or_else(|| unreachable!("buffer length is at least one"));
        trace!(evicted = %evicted, count = self.count(), "Recorded capture");
        evicted
    }

    /// Number of real (non-placeholder) entries.
    pub fn count(&self) -> usize {
        self.entries.iter().filter(|s| !s.is_placeholder()).count()
    }

    /// True once every slot holds a real capture.
    pub fn is_full(&self) -> bool {
        self.count() == self.capacity.get()
    }

    /// Current entries, most recent first.
    pub fn snapshot(&self) -> Vec<SnapReference> {
        self.entries.iter().cloned().collect()
    }

    /// Real captures only, most recent first.
    pub fn real_snaps(&self) -> Vec<SnapReference> {
        self.entries
            .iter()
            .filter(|s| !s.is_placeholder())
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapReference> {
        self.entries.iter()
    }
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::with_placeholder(DEFAULT_CAPACITY, &SnapReference::default())
    }
}
