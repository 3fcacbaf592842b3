use tracing::debug;

use crate::core::{HistorySource, HistoryUpdate};
use crate::error::ChartResult;
use crate::series::SeriesSource;

use super::DataPainter;

impl<S: SeriesSource> DataPainter<S> {
    /// Subscribes to `history` and performs the initial full synchronization.
    ///
    /// A painter is not drawable before this succeeds. On failure the
    /// subscription is withdrawn again. Installing twice re-subscribes.
    pub fn install<H: HistorySource + ?Sized>(&mut self, history: &mut H) -> ChartResult<()> {
        if self.subscription.is_some() {
            self.uninstall(&mut *history);
        }

        let subscription = history.subscribe();
        let id = subscription.id();
        self.subscription = Some(subscription);

        if let Err(err) = self.on_history_update(HistoryUpdate::NewHistory, &*history) {
            history.unsubscribe(id);
            self.subscription = None;
            return Err(err);
        }

        debug!(
            painter = self.config.label(),
            history_len = history.len(),
            "installed painter"
        );
        Ok(())
    }

    /// Stops receiving notifications; queued ones are discarded.
    ///
    /// Renderer state is kept, so paints after this keep drawing the last
    /// synchronized series. Returns `false` when the painter was not installed.
    pub fn uninstall<H: HistorySource + ?Sized>(&mut self, history: &mut H) -> bool {
        let Some(subscription) = self.subscription.take() else {
            return false;
        };
        let removed = history.unsubscribe(subscription.id());
        debug!(painter = self.config.label(), removed, "uninstalled painter");
        true
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Applies the notifications queued since the last pump. Call on the
    /// render thread.
    ///
    /// A single increment is applied as such. Anything else collapses into one
    /// resync: a batch of increments may hide a revision of a candle that is
    /// no longer last. Returns the number of notifications drained.
    pub fn pump<H: HistorySource + ?Sized>(&mut self, history: &H) -> ChartResult<usize> {
        let Some(subscription) = &self.subscription else {
            return Ok(0);
        };

        let mut drained = 0_usize;
        let mut strongest: Option<HistoryUpdate> = None;
        for update in subscription.drain() {
            drained += 1;
            strongest = Some(strongest.map_or(update, |current| current.max(update)));
        }
        let Some(update) = strongest else {
            return Ok(0);
        };

        let update = if drained > 1 {
            debug!(
                painter = self.config.label(),
                drained,
                ?update,
                "coalesced history notifications into a resync"
            );
            update.max(HistoryUpdate::Bulk)
        } else {
            update
        };
        self.on_history_update(update, history)?;
        Ok(drained)
    }
}
