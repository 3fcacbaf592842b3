use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::{Candle, HistorySource, LinearScale, Point, Viewport};
use crate::error::ChartResult;
use crate::render::RenderFrame;

use super::ChartViewConfig;

/// Candle under the cursor and where it sits on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub candle: Candle,
    pub location: Point,
}

/// Drawing context geometry shared by every painter in one pass.
///
/// History index `i` is centered at `x_at(i)`; prices grow upwards.
#[derive(Debug, Clone)]
pub struct ChartView {
    config: ChartViewConfig,
    index_scale: LinearScale,
    price_scale: LinearScale,
    selection: Option<Selection>,
}

impl ChartView {
    pub fn new(config: ChartViewConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            index_scale: LinearScale::new(-0.5, 0.5)?,
            price_scale: LinearScale::new(0.0, 1.0)?,
            selection: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ChartViewConfig {
        self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    #[must_use]
    pub fn price_domain(&self) -> (f64, f64) {
        self.price_scale.domain()
    }

    pub fn set_price_domain(&mut self, min: f64, max: f64) -> ChartResult<()> {
        self.price_scale = LinearScale::new(min, max)?;
        Ok(())
    }

    /// Spreads the whole history over the viewport width and fits the price
    /// domain to its lows and highs. Empty histories leave the view unchanged.
    pub fn fit_to_history<H: HistorySource + ?Sized>(&mut self, history: &H) -> ChartResult<()> {
        let len = history.len();
        if len == 0 {
            return Ok(());
        }
        self.index_scale = LinearScale::new(-0.5, len as f64 - 0.5)?;

        let extremes = (0..len)
            .filter_map(|index| history.get(index))
            .fold(None, |acc: Option<(OrderedFloat<f64>, OrderedFloat<f64>)>, candle| {
                let (low, high) = (OrderedFloat(candle.low), OrderedFloat(candle.high));
                Some(acc.map_or((low, high), |(min, max)| (min.min(low), max.max(high))))
            });
        let Some((OrderedFloat(mut low), OrderedFloat(mut high))) = extremes else {
            return Ok(());
        };
        if low == high {
            low -= 1.0;
            high += 1.0;
        }

        self.price_scale = LinearScale::new(low, high)?.padded(self.config.price_padding_ratio)?;
        trace!(len, low, high, "fitted chart view to history");
        Ok(())
    }

    pub fn x_at(&self, index: usize) -> ChartResult<f64> {
        self.index_scale
            .domain_to_pixel(index as f64, f64::from(self.config.viewport.width))
    }

    pub fn y_at(&self, price: f64) -> ChartResult<f64> {
        let height = f64::from(self.config.viewport.height);
        Ok(height - self.price_scale.domain_to_pixel(price, height)?)
    }

    #[must_use]
    pub fn bar_width_px(&self) -> f64 {
        f64::from(self.config.viewport.width) / self.index_scale.span() * self.config.bar_width_ratio
    }

    /// History index nearest to screen column `x`, clamped to `0..len`.
    #[must_use]
    pub fn index_at_x(&self, x: f64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let logical = self
            .index_scale
            .pixel_to_domain(x, f64::from(self.config.viewport.width))
            .ok()?;
        let nearest = logical.round().max(0.0) as usize;
        Some(nearest.min(len - 1))
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

/// What a renderer sees while painting: view geometry, the frame being built,
/// and whether the owning source wants fill regions.
pub struct PaintContext<'a> {
    view: &'a ChartView,
    frame: &'a mut RenderFrame,
    area_style: bool,
}

impl<'a> PaintContext<'a> {
    pub fn new(view: &'a ChartView, frame: &'a mut RenderFrame, area_style: bool) -> Self {
        Self {
            view,
            frame,
            area_style,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ChartView {
        self.view
    }

    #[must_use]
    pub fn area_style(&self) -> bool {
        self.area_style
    }

    pub fn frame_mut(&mut self) -> &mut RenderFrame {
        self.frame
    }

    pub fn x_at(&self, index: usize) -> ChartResult<f64> {
        self.view.x_at(index)
    }

    pub fn y_at(&self, price: f64) -> ChartResult<f64> {
        self.view.y_at(price)
    }

    #[must_use]
    pub fn bar_width_px(&self) -> f64 {
        self.view.bar_width_px()
    }

    /// Bottom edge of the view, where area fills close.
    #[must_use]
    pub fn baseline_y(&self) -> f64 {
        f64::from(self.view.viewport().height)
    }
}
