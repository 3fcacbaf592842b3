use crate::api::PaintContext;
use crate::core::{Candle, Point};
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, PolygonPrimitive, RectPrimitive};
use crate::series::{SeriesRenderer, SeriesValues};

const SELECTION_MARKER_PX: f64 = 4.0;

/// Connects consecutive committed values with segments.
///
/// When the owning source is area-style, every segment also gets a closed fill
/// region down to the bottom of the view.
pub struct LineSeriesRenderer<S> {
    label: String,
    color: Color,
    fill_color: Color,
    stroke_width: f64,
    precision: usize,
    values: SeriesValues,
    value_of: Box<dyn Fn(&S) -> f64>,
}

impl<S> LineSeriesRenderer<S> {
    /// `value_of` reads the value to commit from the source's accumulator.
    /// Return `f64::NAN` for "no value yet".
    pub fn new(label: impl Into<String>, value_of: impl Fn(&S) -> f64 + 'static) -> Self {
        Self {
            label: label.into(),
            color: Color::SERIES,
            fill_color: Color::SERIES.with_alpha(0.2),
            stroke_width: 1.5,
            precision: 2,
            values: SeriesValues::new(),
            value_of: Box::new(value_of),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_fill_color(mut self, fill_color: Color) -> Self {
        self.fill_color = fill_color;
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn values(&self) -> &SeriesValues {
        &self.values
    }
}

impl<S> SeriesRenderer<S> for LineSeriesRenderer<S> {
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
        if index == 0 {
            return Ok(());
        }
        let (Some(previous), Some(current)) =
            (self.values.get(index - 1), self.values.get(index))
        else {
            return Ok(());
        };

        let x1 = ctx.x_at(index - 1)?;
        let y1 = ctx.y_at(previous)?;
        let x2 = ctx.x_at(index)?;
        let y2 = ctx.y_at(current)?;

        if ctx.area_style() {
            let baseline = ctx.baseline_y();
            ctx.frame_mut().push_polygon(PolygonPrimitive::new(
                vec![(x1, y1), (x2, y2), (x2, baseline), (x1, baseline)],
                self.fill_color,
            ));
        }
        ctx.frame_mut().push_line(LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            self.stroke_width,
            self.color,
        ));
        Ok(())
    }

    fn update_selection(
        &mut self,
        index: usize,
        _candle: &Candle,
        location: Point,
        ctx: &mut PaintContext<'_>,
        header: &mut String,
    ) {
        let Some(value) = self.values.get(index) else {
            return;
        };

        if !header.is_empty() {
            header.push_str(", ");
        }
        header.push_str(&format!("{}: {:.*}", self.label, self.precision, value));

        if let Ok(y) = ctx.y_at(value) {
            let half = SELECTION_MARKER_PX / 2.0;
            ctx.frame_mut().push_rect(RectPrimitive::from_corners(
                location.x - half,
                y - half,
                location.x + half,
                y + half,
                self.color,
            ));
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}
