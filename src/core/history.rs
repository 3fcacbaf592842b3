use std::cmp::Ordering;
use std::sync::mpsc::{self, Receiver, Sender};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::Candle;
use crate::error::{ChartError, ChartResult};

/// Shape of a history mutation, as published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HistoryUpdate {
    /// Single trailing append or in-place revision of the last candle.
    Increment,
    /// Partial replace or backfill; indices may have shifted.
    Bulk,
    /// Whole history replaced.
    NewHistory,
}

impl HistoryUpdate {
    #[must_use]
    pub fn is_increment(self) -> bool {
        self == Self::Increment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Receiving end of one history subscription.
///
/// The receiver is `Send`, so a subscription can be created against a history
/// owned by a producer thread and drained on the render thread.
#[derive(Debug)]
pub struct HistorySubscription {
    id: ListenerId,
    receiver: Receiver<HistoryUpdate>,
}

impl HistorySubscription {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Yields every update queued so far without blocking.
    pub fn drain(&self) -> impl Iterator<Item = HistoryUpdate> + '_ {
        self.receiver.try_iter()
    }
}

/// Read access and change notifications for an ordered candle history.
pub trait HistorySource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candle at `index`, or `None` when the history no longer holds it.
    fn get(&self, index: usize) -> Option<Candle>;

    fn last(&self) -> Option<Candle>;

    /// Position of the bucket `candle` belongs to.
    fn index_of(&self, candle: &Candle) -> Option<usize>;

    fn subscribe(&mut self) -> HistorySubscription;

    /// Returns `false` when `id` was not subscribed.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// In-memory candle history ordered by open time.
#[derive(Debug, Default)]
pub struct CandleHistory {
    candles: Vec<Candle>,
    max_len: Option<usize>,
    listeners: IndexMap<ListenerId, Sender<HistoryUpdate>>,
    next_listener: u64,
}

impl CandleHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// History that drops its oldest candles beyond `max_len`.
    pub fn with_max_len(max_len: usize) -> ChartResult<Self> {
        if max_len == 0 {
            return Err(ChartError::InvalidConfig(
                "history max length must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            max_len: Some(max_len),
            ..Self::default()
        })
    }

    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Replaces the whole history.
    ///
    /// Candles are sorted by open time; when several share a bucket the later
    /// one in input order wins.
    pub fn set_history(&mut self, candles: Vec<Candle>) {
        let original_count = candles.len();
        self.candles = canonicalize_candles(candles);
        self.trim_to_max_len();
        debug!(
            original_count,
            canonical_count = self.candles.len(),
            "set candle history"
        );
        self.notify(HistoryUpdate::NewHistory);
    }

    /// Inserts or replaces buckets anywhere in the history.
    ///
    /// Returns the number of candles applied. Emits `Bulk` when anything changed.
    pub fn merge(&mut self, candles: Vec<Candle>) -> usize {
        let mut applied = 0_usize;
        for candle in canonicalize_candles(candles) {
            match self
                .candles
                .binary_search_by(|probe| probe.open_time.cmp(&candle.open_time))
            {
                Ok(index) => self.candles[index] = candle,
                Err(index) => self.candles.insert(index, candle),
            }
            applied += 1;
        }
        if applied == 0 {
            return 0;
        }

        self.trim_to_max_len();
        debug!(applied, history_len = self.candles.len(), "merged candles");
        self.notify(HistoryUpdate::Bulk);
        applied
    }

    /// Applies one live candle with realtime semantics:
    /// - appends when its bucket is newer than the latest
    /// - revises the latest in place when the bucket is equal
    /// - rejects older buckets
    pub fn push(&mut self, candle: Candle) -> ChartResult<HistoryUpdate> {
        match self
            .candles
            .last()
            .map_or(Ordering::Greater, |last| candle.open_time.cmp(&last.open_time))
        {
            Ordering::Less => {
                warn!(
                    open_time = candle.open_time,
                    "rejected out-of-order candle push"
                );
                return Err(ChartError::InvalidData(
                    "candle open time must be >= latest open time".to_owned(),
                ));
            }
            Ordering::Equal => {
                if let Some(last) = self.candles.last_mut() {
                    *last = candle;
                }
                trace!(open_time = candle.open_time, "revised last candle");
            }
            Ordering::Greater => {
                self.candles.push(candle);
                trace!(
                    open_time = candle.open_time,
                    history_len = self.candles.len(),
                    "appended candle"
                );
            }
        }

        let update = if self.trim_to_max_len() > 0 {
            HistoryUpdate::Bulk
        } else {
            HistoryUpdate::Increment
        };
        self.notify(update);
        Ok(update)
    }

    pub fn clear(&mut self) {
        self.candles.clear();
        self.notify(HistoryUpdate::NewHistory);
    }

    fn trim_to_max_len(&mut self) -> usize {
        let Some(max_len) = self.max_len else {
            return 0;
        };
        let excess = self.candles.len().saturating_sub(max_len);
        if excess > 0 {
            self.candles.drain(..excess);
        }
        excess
    }

    fn notify(&mut self, update: HistoryUpdate) {
        let before = self.listeners.len();
        self.listeners
            .retain(|_, sender| sender.send(update).is_ok());
        let pruned = before - self.listeners.len();
        if pruned > 0 {
            debug!(pruned, "pruned disconnected history listeners");
        }
    }
}

impl HistorySource for CandleHistory {
    fn len(&self) -> usize {
        self.candles.len()
    }

    fn get(&self, index: usize) -> Option<Candle> {
        self.candles.get(index).copied()
    }

    fn last(&self) -> Option<Candle> {
        self.candles.last().copied()
    }

    fn index_of(&self, candle: &Candle) -> Option<usize> {
        self.candles
            .binary_search_by(|probe| probe.open_time.cmp(&candle.open_time))
            .ok()
    }

    fn subscribe(&mut self) -> HistorySubscription {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let (sender, receiver) = mpsc::channel();
        self.listeners.insert(id, sender);
        debug!(listener = id.0, "history listener subscribed");
        HistorySubscription { id, receiver }
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.shift_remove(&id).is_some();
        if removed {
            debug!(listener = id.0, "history listener unsubscribed");
        }
        removed
    }
}

fn canonicalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    // Stable sort keeps input order within a bucket, so the last one wins below.
    candles.sort_by_key(|candle| candle.open_time);

    let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
    let mut duplicate_count = 0_usize;
    for candle in candles {
        if let Some(last) = deduped.last_mut() {
            if last.same_bucket(&candle) {
                *last = candle;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(candle);
    }

    if duplicate_count > 0 {
        warn!(
            duplicate_count,
            canonical_count = deduped.len(),
            "collapsed duplicate candle buckets"
        );
    }
    deduped
}
