use tracing::trace;

use crate::core::HistorySource;
use crate::error::ChartResult;
use crate::render::RenderFrame;
use crate::series::SeriesSource;

use super::{ChartView, DataPainter, PaintContext};

impl<S: SeriesSource> DataPainter<S> {
    /// Draws every committed slot of every renderer into `frame` and rebuilds
    /// the selection header.
    ///
    /// Safe to call before install and after uninstall: renderers that never
    /// committed an index simply skip it. A failing slot aborts the pass and
    /// leaves the header of the previous paint in place.
    pub fn paint<H: HistorySource + ?Sized>(
        &mut self,
        history: &H,
        view: &ChartView,
        frame: &mut RenderFrame,
    ) -> ChartResult<()> {
        let area_style = self.source.is_area_style();
        let mut ctx = PaintContext::new(view, frame, area_style);

        let history_len = history.len();
        for index in 0..history_len {
            for renderer in self.renderers.slots_mut() {
                renderer.paint_next(index, &mut ctx)?;
            }
        }
        self.header.clear();

        if !self.config.show_header {
            return Ok(());
        }
        let Some(selection) = view.selection().copied() else {
            return Ok(());
        };
        let Some(index) = history.index_of(&selection.candle) else {
            trace!(
                painter = self.config.label(),
                open_time = selection.candle.open_time,
                "selected candle no longer in history"
            );
            return Ok(());
        };

        self.fragments.clear();
        for renderer in self.renderers.slots_mut() {
            renderer.update_selection(
                index,
                &selection.candle,
                selection.location,
                &mut ctx,
                &mut self.fragments,
            );
        }

        self.header.push_str(self.config.label());
        if !self.fragments.is_empty() {
            self.header.push('[');
            self.header.push_str(&self.fragments);
            self.header.push(']');
        }
        trace!(
            painter = self.config.label(),
            history_len,
            header = %self.header,
            "painted"
        );
        Ok(())
    }
}
