//! chart-painter: keeps stateful chart series renderers in step with a live
//! candle history.
//!
//! A [`DataPainter`] observes a [`core::HistorySource`], classifies each
//! change as a full resync, an append of a new candle or a revision of the
//! last one, and drives its [`series::SeriesRenderer`] slots accordingly so
//! that every candle is folded into renderer state exactly once. Painting
//! walks the committed slots into a backend-agnostic [`render::RenderFrame`]
//! and builds a selection header for the candle under the cursor.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{ChartView, ChartViewConfig, DataPainter, PainterConfig, PainterSet};
pub use error::{ChartError, ChartResult};
