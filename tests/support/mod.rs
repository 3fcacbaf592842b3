#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chart_painter::api::PaintContext;
use chart_painter::core::{
    Candle, CandleHistory, HistorySource, HistorySubscription, ListenerId, Point, Rect,
};
use chart_painter::series::{RendererSet, SeriesRenderer, SeriesSource};

/// One observable step, in the order the engine performed it.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    ResetAccumulator,
    Advance(i64),
    Reset { slot: usize, expected_len: usize },
    Next { slot: usize, value: f64 },
    Update { slot: usize, value: f64 },
    Paint { slot: usize, index: usize },
}

pub type Journal = Rc<RefCell<Vec<Entry>>>;

pub fn minute(i: i64) -> i64 {
    i * 60_000
}

pub fn candle(open_time: i64, close: f64) -> Candle {
    Candle::new(
        open_time,
        open_time + 59_999,
        close,
        close + 1.0,
        close - 1.0,
        close,
        10.0,
    )
    .expect("valid candle")
}

pub fn candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| candle(minute(i as i64), 100.0 + i as f64))
        .collect()
}

pub fn history_of(count: usize) -> CandleHistory {
    let mut history = CandleHistory::new();
    history.set_history(candles(count));
    history
}

/// Accumulator that remembers the last close and journals every callback.
pub struct RecordingSource {
    pub journal: Journal,
    pub slot_count: usize,
    pub refuse_renderers: bool,
    pub area_style: bool,
    pub describe: bool,
    pub last_close: f64,
    pub slot_values: Vec<Rc<RefCell<Vec<f64>>>>,
    /// While set, every renderer fails its `paint_next`.
    pub fail_paint: Rc<Cell<bool>>,
}

impl RecordingSource {
    pub fn new(slot_count: usize) -> Self {
        Self {
            journal: Rc::new(RefCell::new(Vec::new())),
            slot_count,
            refuse_renderers: false,
            area_style: false,
            describe: true,
            last_close: f64::NAN,
            slot_values: Vec::new(),
            fail_paint: Rc::new(Cell::new(false)),
        }
    }

    pub fn silent(mut self) -> Self {
        self.describe = false;
        self
    }

    pub fn refusing(mut self) -> Self {
        self.refuse_renderers = true;
        self
    }

    pub fn values(&self) -> Vec<Vec<f64>> {
        self.slot_values
            .iter()
            .map(|values| values.borrow().clone())
            .collect()
    }
}

impl SeriesSource for RecordingSource {
    fn reset_accumulator(&mut self) {
        self.last_close = f64::NAN;
        self.journal.borrow_mut().push(Entry::ResetAccumulator);
    }

    fn advance(&mut self, candle: &Candle) {
        self.last_close = candle.close;
        self.journal.borrow_mut().push(Entry::Advance(candle.open_time));
    }

    fn create_renderers(&mut self) -> Option<RendererSet<Self>> {
        if self.refuse_renderers {
            return None;
        }
        let mut renderers: RendererSet<Self> = RendererSet::new();
        for slot in 0..self.slot_count {
            let values = Rc::new(RefCell::new(Vec::new()));
            self.slot_values.push(values.clone());
            renderers.push(Box::new(RecordingRenderer {
                slot,
                journal: self.journal.clone(),
                values,
                describe: self.describe,
                fail_paint: self.fail_paint.clone(),
            }));
        }
        Some(renderers)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 640.0, 480.0)
    }

    fn is_area_style(&self) -> bool {
        self.area_style
    }
}

pub struct RecordingRenderer {
    slot: usize,
    journal: Journal,
    values: Rc<RefCell<Vec<f64>>>,
    describe: bool,
    fail_paint: Rc<Cell<bool>>,
}

impl SeriesRenderer<RecordingSource> for RecordingRenderer {
    fn reset(&mut self, expected_len: usize) {
        self.values.borrow_mut().clear();
        self.journal.borrow_mut().push(Entry::Reset {
            slot: self.slot,
            expected_len,
        });
    }

    fn next_value(&mut self, source: &RecordingSource) {
        self.values.borrow_mut().push(source.last_close);
        self.journal.borrow_mut().push(Entry::Next {
            slot: self.slot,
            value: source.last_close,
        });
    }

    fn update_value(&mut self, source: &RecordingSource) {
        if let Some(last) = self.values.borrow_mut().last_mut() {
            *last = source.last_close;
        }
        self.journal.borrow_mut().push(Entry::Update {
            slot: self.slot,
            value: source.last_close,
        });
    }

    fn paint_next(
        &mut self,
        index: usize,
        _ctx: &mut PaintContext<'_>,
    ) -> chart_painter::ChartResult<()> {
        if self.fail_paint.get() {
            return Err(chart_painter::ChartError::InvalidData(format!(
                "slot {} cannot paint index {index}",
                self.slot
            )));
        }
        if index < self.values.borrow().len() {
            self.journal.borrow_mut().push(Entry::Paint {
                slot: self.slot,
                index,
            });
        }
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
        if !self.describe {
            return;
        }
        let Some(value) = self.values.borrow().get(index).copied() else {
            return;
        };
        if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(&format!("s{}={value}", self.slot));
    }

    fn len(&self) -> usize {
        self.values.borrow().len()
    }
}

pub fn count(journal: &Journal, matches: impl Fn(&Entry) -> bool) -> usize {
    journal.borrow().iter().filter(|entry| matches(entry)).count()
}

pub fn nexts(journal: &Journal) -> usize {
    count(journal, |entry| matches!(entry, Entry::Next { .. }))
}

pub fn updates(journal: &Journal) -> usize {
    count(journal, |entry| matches!(entry, Entry::Update { .. }))
}

pub fn advances(journal: &Journal) -> Vec<i64> {
    journal
        .borrow()
        .iter()
        .filter_map(|entry| match entry {
            Entry::Advance(open_time) => Some(*open_time),
            _ => None,
        })
        .collect()
}

/// History whose candles from `missing_from` on read as absent, as if it had
/// been trimmed while a replay was walking it.
pub struct VanishingHistory {
    pub inner: CandleHistory,
    pub missing_from: usize,
}

impl HistorySource for VanishingHistory {
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, index: usize) -> Option<Candle> {
        if index >= self.missing_from {
            None
        } else {
            self.inner.get(index)
        }
    }

    fn last(&self) -> Option<Candle> {
        self.inner.last()
    }

    fn index_of(&self, candle: &Candle) -> Option<usize> {
        self.inner.index_of(candle)
    }

    fn subscribe(&mut self) -> HistorySubscription {
        self.inner.subscribe()
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.inner.unsubscribe(id)
    }
}
