//! Painter engine: synchronization, painting, lifecycle and the owner layer.

mod chart_view;
mod data_painter;
mod lifecycle;
mod paint_driver;
mod painter_config;
mod painter_set;
mod repaint;
mod sync_plan;

pub use chart_view::{ChartView, PaintContext, Selection};
pub use data_painter::{DataPainter, RendererState, SyncStats};
pub use painter_config::{ChartViewConfig, PainterConfig};
pub use painter_set::{Painter, PainterSet};
pub use repaint::{InvalidationLevel, RepaintScheduler};
pub use sync_plan::{SyncPlan, SyncSnapshot, plan_sync};
