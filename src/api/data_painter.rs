use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Candle, HistorySource, HistorySubscription, HistoryUpdate, Rect};
use crate::error::{ChartError, ChartResult};
use crate::series::{RendererSet, SeriesRenderer, SeriesSource};

use super::repaint::{InvalidationLevel, RepaintScheduler};
use super::sync_plan::{SyncPlan, SyncSnapshot, plan_sync};
use super::PainterConfig;

/// Renderer slots of a painter. Created on the first resync, never replaced.
pub enum RendererState<S> {
    Uninitialized,
    Ready(RendererSet<S>),
}

impl<S> RendererState<S> {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Slots in creation order; empty before initialization.
    #[must_use]
    pub fn slots(&self) -> &[Box<dyn SeriesRenderer<S>>] {
        match self {
            Self::Uninitialized => &[],
            Self::Ready(renderers) => renderers.as_slice(),
        }
    }

    pub fn slots_mut(&mut self) -> &mut [Box<dyn SeriesRenderer<S>>] {
        match self {
            Self::Uninitialized => &mut [],
            Self::Ready(renderers) => renderers.as_mut_slice(),
        }
    }
}

/// Counters of what the engine did since construction.
///
/// `appends` and `revisions` count tail steps, including the tail step that
/// closes every resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncStats {
    pub resyncs: u64,
    pub appends: u64,
    pub revisions: u64,
    pub aborted_replays: u64,
}

/// Keeps the renderer slots of one series source in step with a candle
/// history and paints them.
///
/// Every history notification ends in a tail step against the last candle:
/// the source is advanced with it, then each renderer either commits a new
/// slot (new bucket) or rewrites its latest slot (same bucket, revised).
/// Non-incremental notifications first reset everything and replay all but
/// the last candle.
pub struct DataPainter<S: SeriesSource> {
    pub(super) config: PainterConfig,
    pub(super) source: S,
    pub(super) renderers: RendererState<S>,
    pub(super) previous_last: Option<Candle>,
    pub(super) synced_len: usize,
    pub(super) header: String,
    pub(super) fragments: String,
    pub(super) subscription: Option<HistorySubscription>,
    pub(super) repaint: RepaintScheduler,
    pub(super) stats: SyncStats,
}

impl<S: SeriesSource> DataPainter<S> {
    #[must_use]
    pub fn new(config: PainterConfig, source: S) -> Self {
        Self {
            config,
            source,
            renderers: RendererState::Uninitialized,
            previous_last: None,
            synced_len: 0,
            header: String::new(),
            fragments: String::new(),
            subscription: None,
            repaint: RepaintScheduler::new(),
            stats: SyncStats::default(),
        }
    }

    /// Routes repaint requests to a scheduler shared with other painters.
    #[must_use]
    pub fn with_repaint(mut self, scheduler: RepaintScheduler) -> Self {
        self.repaint = scheduler;
        self
    }

    pub fn set_repaint(&mut self, scheduler: RepaintScheduler) {
        self.repaint = scheduler;
    }

    #[must_use]
    pub fn repaint(&self) -> &RepaintScheduler {
        &self.repaint
    }

    #[must_use]
    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn renderers(&self) -> &[Box<dyn SeriesRenderer<S>>] {
        self.renderers.slots()
    }

    /// `None` until the first synchronization created the renderers.
    #[must_use]
    pub fn renderer_count(&self) -> Option<usize> {
        self.renderers.is_ready().then(|| self.renderers.slots().len())
    }

    /// Selection description produced by the last paint; empty when nothing
    /// is selected.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.source.bounds()
    }

    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Number of candles committed into every renderer.
    #[must_use]
    pub fn synced_len(&self) -> usize {
        self.synced_len
    }

    #[must_use]
    pub fn previous_last(&self) -> Option<&Candle> {
        self.previous_last.as_ref()
    }

    /// Reconciles renderer state with `history` after a change of shape `update`.
    ///
    /// Fails only when the source refuses to create renderers; the engine is
    /// left untouched in that case.
    pub fn on_history_update<H: HistorySource + ?Sized>(
        &mut self,
        update: HistoryUpdate,
        history: &H,
    ) -> ChartResult<()> {
        let history_last = history.last();
        let plan = plan_sync(
            update,
            SyncSnapshot {
                renderers_ready: self.renderers.is_ready(),
                synced_len: self.synced_len,
                previous_last: self.previous_last.as_ref(),
                history_len: history.len(),
                history_last: history_last.as_ref(),
            },
        );

        match plan {
            SyncPlan::Resync => {
                if update.is_increment() && self.renderers.is_ready() {
                    debug!(
                        painter = self.config.label(),
                        synced_len = self.synced_len,
                        history_len = history.len(),
                        "renderer state drifted from history; resyncing"
                    );
                }
                self.resync(history)?;
                self.tail_step(history);
                self.repaint.request(InvalidationLevel::Full);
            }
            SyncPlan::Append | SyncPlan::Revise => {
                self.tail_step(history);
                self.repaint.request(InvalidationLevel::Light);
            }
        }
        Ok(())
    }

    fn ensure_renderers(&mut self) -> ChartResult<()> {
        if self.renderers.is_ready() {
            return Ok(());
        }
        let renderers =
            self.source
                .create_renderers()
                .ok_or_else(|| ChartError::MissingRenderers {
                    painter: self.painter_name(),
                })?;
        debug!(
            painter = self.config.label(),
            renderer_count = renderers.len(),
            "created renderers"
        );
        self.renderers = RendererState::Ready(renderers);
        Ok(())
    }

    /// Resets the source and every renderer, then replays all candles but the
    /// last. The last one is left to the tail step.
    fn resync<H: HistorySource + ?Sized>(&mut self, history: &H) -> ChartResult<()> {
        self.ensure_renderers()?;
        self.source.reset_accumulator();
        self.previous_last = None;

        let history_len = history.len();
        for renderer in self.renderers.slots_mut() {
            renderer.reset(history_len);
        }

        let mut replayed = 0_usize;
        for index in 0..history_len.saturating_sub(1) {
            let Some(candle) = history.get(index) else {
                self.stats.aborted_replays += 1;
                debug!(
                    painter = self.config.label(),
                    index, history_len, "history shrank during replay; stopping early"
                );
                break;
            };
            self.source.advance(&candle);
            for renderer in self.renderers.slots_mut() {
                renderer.next_value(&self.source);
            }
            replayed += 1;
        }

        self.synced_len = replayed;
        self.stats.resyncs += 1;
        debug!(
            painter = self.config.label(),
            history_len, replayed, "replayed history"
        );
        Ok(())
    }

    fn tail_step<H: HistorySource + ?Sized>(&mut self, history: &H) {
        let Some(last) = history.last() else {
            self.previous_last = None;
            trace!(painter = self.config.label(), "history empty; no tail step");
            return;
        };

        self.source.advance(&last);
        let revision = self
            .previous_last
            .is_some_and(|previous| previous.same_bucket(&last));
        if revision {
            for renderer in self.renderers.slots_mut() {
                renderer.update_value(&self.source);
            }
            self.stats.revisions += 1;
        } else {
            for renderer in self.renderers.slots_mut() {
                renderer.next_value(&self.source);
            }
            self.synced_len += 1;
            self.stats.appends += 1;
        }
        trace!(
            painter = self.config.label(),
            open_time = last.open_time,
            revision,
            synced_len = self.synced_len,
            "tail step"
        );
        self.previous_last = Some(last);
    }

    pub(super) fn painter_name(&self) -> String {
        match self.config.label() {
            "" => "<unnamed>".to_owned(),
            label => label.to_owned(),
        }
    }
}
