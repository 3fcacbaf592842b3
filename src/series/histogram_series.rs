use crate::api::PaintContext;
use crate::core::{Candle, Point};
use crate::error::ChartResult;
use crate::render::{Color, RectPrimitive};
use crate::series::{SeriesRenderer, SeriesValues};

/// Draws one bar per committed value, from `baseline` to the value.
///
/// Bars rising against the previous slot use `up_color`, others `down_color`.
pub struct HistogramSeriesRenderer<S> {
    label: String,
    up_color: Color,
    down_color: Color,
    baseline: f64,
    precision: usize,
    values: SeriesValues,
    value_of: Box<dyn Fn(&S) -> f64>,
}

impl<S> HistogramSeriesRenderer<S> {
    pub fn new(label: impl Into<String>, value_of: impl Fn(&S) -> f64 + 'static) -> Self {
        Self {
            label: label.into(),
            up_color: Color::BULLISH,
            down_color: Color::BEARISH,
            baseline: 0.0,
            precision: 2,
            values: SeriesValues::new(),
            value_of: Box::new(value_of),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, up_color: Color, down_color: Color) -> Self {
        self.up_color = up_color;
        self.down_color = down_color;
        self
    }

    #[must_use]
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn values(&self) -> &SeriesValues {
        &self.values
    }

    fn color_at(&self, index: usize, value: f64) -> Color {
        let rising = index
            .checked_sub(1)
            .and_then(|previous| self.values.get(previous))
            .is_none_or(|previous| value >= previous);
        if rising {
            self.up_color
        } else {
            self.down_color
        }
    }
}

impl<S> SeriesRenderer<S> for HistogramSeriesRenderer<S> {
    fn reset(&mut self, expected_len: usize) {
        self.values.reset(expected_len);
    }

    fn next_value(&mut self, source: &S) {
        self.values.commit((self.value_of)(source));
    }

    fn update_value(&mut self, source: &S) {
        self.values.revise((self.value_of)(source));
    }

    fn paint_next(&mut self, index: usize, ctx: &mut PaintContext<'_>) -> ChartResult<()> {
        let Some(value) = self.values.get(index) else {
            return Ok(());
        };

        let center = ctx.x_at(index)?;
        let half = ctx.bar_width_px() / 2.0;
        let top = ctx.y_at(value)?;
        let bottom = ctx.y_at(self.baseline)?;
        let color = self.color_at(index, value);
        ctx.frame_mut().push_rect(RectPrimitive::from_corners(
            center - half,
            top,
            center + half,
            bottom,
            color,
        ));
        Ok(())
    }

    fn update_selection(
        &mut self,
        index: usize,
        _candle: &Candle,
        _location: Point,
        _ctx: &mut PaintContext<'_>,
        header: &mut String,
    ) {
        let Some(value) = self.values.get(index) else {
            return;
        };
        if !header.is_empty() {
            header.push_str(", ");
        }
        header.push_str(&format!("{}: {:.*}", self.label, self.precision, value));
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
