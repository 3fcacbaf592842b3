use serde::{Deserialize, Serialize};

use crate::core::{Candle, HistoryUpdate};

/// How one history notification is reconciled with renderer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPlan {
    /// Reset every renderer and replay the whole history.
    Resync,
    /// Commit the last candle as a new slot.
    Append,
    /// Rewrite the latest slot from the revised last candle.
    Revise,
}

/// Engine-side facts the classifier needs besides the update kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSnapshot<'a> {
    pub renderers_ready: bool,
    /// Candles committed into renderers so far.
    pub synced_len: usize,
    pub previous_last: Option<&'a Candle>,
    pub history_len: usize,
    pub history_last: Option<&'a Candle>,
}

/// Decides between a full rebuild and a single tail step.
///
/// Only increments can be applied incrementally, and only when the history
/// length agrees with what the renderers hold: equal for a revision, one more
/// for an append. Anything else (an aborted replay, increments drained in one
/// batch, a trimmed head) falls back to a resync.
#[must_use]
pub fn plan_sync(update: HistoryUpdate, snapshot: SyncSnapshot<'_>) -> SyncPlan {
    if !update.is_increment() || !snapshot.renderers_ready {
        return SyncPlan::Resync;
    }
    let Some(last) = snapshot.history_last else {
        return SyncPlan::Resync;
    };

    let revision = snapshot
        .previous_last
        .is_some_and(|previous| previous.same_bucket(last));
    match (revision, snapshot.history_len) {
        (true, len) if len == snapshot.synced_len => SyncPlan::Revise,
        (false, len) if len == snapshot.synced_len + 1 => SyncPlan::Append,
        _ => SyncPlan::Resync,
    }
}
