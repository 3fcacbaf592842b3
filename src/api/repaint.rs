use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Ordered repaint classes; a pending request only ever escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Only the selection header / cursor overlay changed.
    Cursor,
    /// The trailing slot of some series changed.
    Light,
    /// Series were rebuilt from scratch.
    Full,
}

impl InvalidationLevel {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Cursor,
            2 => Self::Light,
            _ => Self::Full,
        }
    }
}

#[derive(Debug, Default)]
struct RepaintState {
    pending: AtomicU8,
    requests: AtomicU64,
}

/// Fire-and-forget repaint requests, collapsed until the frame loop takes them.
///
/// Clones share state, so every painter of a chart can hold one while the
/// owner drains it once per frame. Safe to request from any thread.
#[derive(Debug, Clone, Default)]
pub struct RepaintScheduler {
    state: Arc<RepaintState>,
}

impl RepaintScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, level: InvalidationLevel) {
        self.state.requests.fetch_add(1, Ordering::Relaxed);
        self.state.pending.fetch_max(level as u8, Ordering::AcqRel);
    }

    #[must_use]
    pub fn pending(&self) -> InvalidationLevel {
        InvalidationLevel::from_u8(self.state.pending.load(Ordering::Acquire))
    }

    /// Returns the highest level requested since the last call and clears it.
    pub fn take(&self) -> InvalidationLevel {
        InvalidationLevel::from_u8(self.state.pending.swap(0, Ordering::AcqRel))
    }

    /// Total requests issued, coalesced or not.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.state.requests.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn shares_state_with(&self, other: &RepaintScheduler) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}
