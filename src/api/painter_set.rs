use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{HistorySource, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RenderFrame, Renderer, TextHAlign, TextPrimitive};
use crate::series::SeriesSource;

use super::{ChartView, DataPainter, InvalidationLevel, RepaintScheduler};

const HEADER_LEFT_PX: f64 = 6.0;
const HEADER_LINE_SPACING: f64 = 1.4;

/// Object-safe view of a painter, so painters over different sources can
/// share one chart.
pub trait Painter {
    fn install(&mut self, history: &mut dyn HistorySource) -> ChartResult<()>;
    fn uninstall(&mut self, history: &mut dyn HistorySource) -> bool;
    fn pump(&mut self, history: &dyn HistorySource) -> ChartResult<usize>;
    fn paint(
        &mut self,
        history: &dyn HistorySource,
        view: &ChartView,
        frame: &mut RenderFrame,
    ) -> ChartResult<()>;
    fn header(&self) -> &str;
    fn bounds(&self) -> Rect;
    fn is_installed(&self) -> bool;
    fn set_repaint(&mut self, scheduler: RepaintScheduler);
}

impl<S: SeriesSource> Painter for DataPainter<S> {
    fn install(&mut self, history: &mut dyn HistorySource) -> ChartResult<()> {
        DataPainter::install(self, history)
    }

    fn uninstall(&mut self, history: &mut dyn HistorySource) -> bool {
        DataPainter::uninstall(self, history)
    }

    fn pump(&mut self, history: &dyn HistorySource) -> ChartResult<usize> {
        DataPainter::pump(self, history)
    }

    fn paint(
        &mut self,
        history: &dyn HistorySource,
        view: &ChartView,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        DataPainter::paint(self, history, view, frame)
    }

    fn header(&self) -> &str {
        DataPainter::header(self)
    }

    fn bounds(&self) -> Rect {
        DataPainter::bounds(self)
    }

    fn is_installed(&self) -> bool {
        DataPainter::is_installed(self)
    }

    fn set_repaint(&mut self, scheduler: RepaintScheduler) {
        DataPainter::set_repaint(self, scheduler);
    }
}

/// Painters of one chart, painted in insertion order and sharing one repaint
/// scheduler, which is what collapses their requests into one frame.
#[derive(Default)]
pub struct PainterSet {
    painters: IndexMap<String, Box<dyn Painter>>,
    repaint: RepaintScheduler,
}

impl PainterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn repaint(&self) -> &RepaintScheduler {
        &self.repaint
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.painters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.painters.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Painter> {
        self.painters.get(id).map(|painter| &**painter)
    }

    /// Adds a painter under a unique id. The painter is not installed yet.
    pub fn insert(&mut self, id: impl Into<String>, mut painter: Box<dyn Painter>) -> ChartResult<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(ChartError::InvalidConfig(
                "painter id must not be empty".to_owned(),
            ));
        }
        if self.painters.contains_key(&id) {
            return Err(ChartError::InvalidConfig(format!(
                "painter id `{id}` is already registered"
            )));
        }
        painter.set_repaint(self.repaint.clone());
        debug!(painter_id = %id, "registered painter");
        self.painters.insert(id, painter);
        Ok(())
    }

    /// Uninstalls and removes a painter, keeping the order of the others.
    pub fn remove(&mut self, id: &str, history: &mut dyn HistorySource) -> Option<Box<dyn Painter>> {
        let mut painter = self.painters.shift_remove(id)?;
        painter.uninstall(history);
        self.repaint.request(InvalidationLevel::Full);
        Some(painter)
    }

    /// Installs every painter not installed yet. Stops at the first failure.
    pub fn install_all(&mut self, history: &mut dyn HistorySource) -> ChartResult<()> {
        for (id, painter) in &mut self.painters {
            if painter.is_installed() {
                continue;
            }
            painter.install(history).inspect_err(|err| {
                debug!(painter_id = %id, error = %err, "painter install failed");
            })?;
        }
        Ok(())
    }

    pub fn uninstall_all(&mut self, history: &mut dyn HistorySource) {
        for painter in self.painters.values_mut() {
            painter.uninstall(history);
        }
    }

    /// Applies queued history notifications to every painter.
    pub fn pump_all(&mut self, history: &dyn HistorySource) -> ChartResult<usize> {
        let mut drained = 0;
        for painter in self.painters.values_mut() {
            drained += painter.pump(history)?;
        }
        Ok(drained)
    }

    /// Paints every painter into `frame`, then lays the non-empty headers out
    /// as text lines in the top-left corner.
    pub fn paint_all(
        &mut self,
        history: &dyn HistorySource,
        view: &ChartView,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        for painter in self.painters.values_mut() {
            painter.paint(history, view, frame)?;
        }

        let font_size_px = view.config().header_font_size_px;
        let headers = self
            .painters
            .values()
            .map(|painter| painter.header())
            .filter(|header| !header.is_empty());
        for (row, header) in headers.enumerate() {
            frame.push_text(TextPrimitive::new(
                header,
                HEADER_LEFT_PX,
                font_size_px * HEADER_LINE_SPACING * row as f64 + font_size_px,
                font_size_px,
                Color::TEXT,
                TextHAlign::Left,
            ));
        }
        Ok(())
    }

    /// Renders one frame if any repaint was requested since the last call.
    ///
    /// Returns whether a frame was rendered.
    pub fn render_if_needed<R: Renderer>(
        &mut self,
        history: &dyn HistorySource,
        view: &ChartView,
        renderer: &mut R,
    ) -> ChartResult<bool> {
        let level = self.repaint.take();
        if level == InvalidationLevel::None {
            return Ok(false);
        }

        let mut frame = RenderFrame::new(view.viewport());
        self.paint_all(history, view, &mut frame)?;
        renderer.render(&frame)?;
        trace!(
            ?level,
            primitives = frame.primitive_count(),
            "rendered chart frame"
        );
        Ok(true)
    }

    /// `(id, header)` pairs in paint order, including empty headers.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.painters
            .iter()
            .map(|(id, painter)| (id.as_str(), painter.header()))
    }

    /// Non-empty headers joined with two spaces.
    #[must_use]
    pub fn combined_header(&self) -> String {
        self.painters
            .values()
            .map(|painter| painter.header())
            .filter(|header| !header.is_empty())
            .collect::<Vec<_>>()
            .join("  ")
    }
}
