//! Pointer tracking that turns a cursor position into the selected candle.

use serde::{Deserialize, Serialize};

use crate::api::{ChartView, Selection};
use crate::core::{HistorySource, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Select the candle nearest to the pointer column.
    #[default]
    Nearest,
    /// Never select; headers stay empty.
    Disabled,
}

/// Last known pointer position over the chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pointer: Option<Point>,
    mode: SelectionMode,
}

impl CursorState {
    #[must_use]
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            pointer: None,
            mode,
        }
    }

    #[must_use]
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Some(Point::new(x, y));
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
    }

    /// Candle nearest to the pointer column, located at its bar center and
    /// close price.
    #[must_use]
    pub fn resolve_selection<H: HistorySource + ?Sized>(
        &self,
        view: &ChartView,
        history: &H,
    ) -> Option<Selection> {
        if self.mode == SelectionMode::Disabled {
            return None;
        }
        let pointer = self.pointer?;
        let index = view.index_at_x(pointer.x, history.len())?;
        let candle = history.get(index)?;
        let location = Point::new(view.x_at(index).ok()?, view.y_at(candle.close).ok()?);
        Some(Selection { candle, location })
    }

    /// Writes the resolved selection into `view`. Returns whether it changed.
    pub fn apply<H: HistorySource + ?Sized>(&self, view: &mut ChartView, history: &H) -> bool {
        let selection = self.resolve_selection(view, history);
        if view.selection() == selection.as_ref() {
            return false;
        }
        view.set_selection(selection);
        true
    }
}
