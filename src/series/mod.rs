//! Renderer slots and the owner capability they read from.
//!
//! A painter owns one [`SeriesSource`] (the accumulator state of an indicator
//! or price series) and the fixed [`RendererSet`] that source creates. The
//! synchronization engine advances the source one candle at a time and then
//! tells every renderer whether to commit a new slot or revise the last one.

pub mod histogram_series;
pub mod line_series;
pub mod values;

use smallvec::SmallVec;

use crate::api::PaintContext;
use crate::core::{Candle, Point, Rect};
use crate::error::ChartResult;

pub use histogram_series::HistogramSeriesRenderer;
pub use line_series::LineSeriesRenderer;
pub use values::SeriesValues;

/// Renderers owned by one painter. Most painters have one to three series.
pub type RendererSet<S> = SmallVec<[Box<dyn SeriesRenderer<S>>; 4]>;

/// Accumulator state a painter advances candle by candle.
pub trait SeriesSource: Sized + 'static {
    /// Drops everything accumulated so far; called before every full replay.
    fn reset_accumulator(&mut self);

    /// Folds one candle into the accumulator.
    ///
    /// Called again with the revised candle when the latest bucket changes in
    /// place, so implementations must treat a repeated bucket as a
    /// replacement of the previous call, not as new data.
    fn advance(&mut self, candle: &Candle);

    /// Creates the renderer slots for this source. Called once per painter.
    ///
    /// `None` is a programming error and aborts installation; an empty set is
    /// a valid painter that draws nothing.
    fn create_renderers(&mut self) -> Option<RendererSet<Self>>;

    fn bounds(&self) -> Rect;

    /// Area-style sources get fill regions from renderers that support them.
    fn is_area_style(&self) -> bool {
        false
    }
}

/// One visual series with a cursor aligned to history indices.
pub trait SeriesRenderer<S: ?Sized> {
    /// Drops all committed slots and pre-sizes for `expected_len`.
    fn reset(&mut self, expected_len: usize);

    /// Commits the source's current value as a new slot.
    fn next_value(&mut self, source: &S);

    /// Recomputes the most recently committed slot from the source.
    fn update_value(&mut self, source: &S);

    /// Draws the slot at `index`. Indices not committed yet are ignored.
    fn paint_next(&mut self, index: usize, ctx: &mut PaintContext<'_>) -> ChartResult<()>;

    /// Appends a description of the slot at `index` to `header`, including any
    /// separator it needs. Appends nothing when there is nothing to show.
    fn update_selection(
        &mut self,
        index: usize,
        candle: &Candle,
        location: Point,
        ctx: &mut PaintContext<'_>,
        header: &mut String,
    );

    /// Number of committed slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
