use chart_painter::api::{ChartView, ChartViewConfig};
use chart_painter::core::{Candle, CandleHistory, HistoryUpdate, Rect, Viewport};
use chart_painter::render::RenderFrame;
use chart_painter::series::{HistogramSeriesRenderer, LineSeriesRenderer, RendererSet, SeriesSource};
use chart_painter::{DataPainter, PainterConfig};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Exponential moving average of closes.
struct EmaSource {
    alpha: f64,
    committed: f64,
    value: f64,
    volume: f64,
    last_open_time: Option<i64>,
}

impl EmaSource {
    fn new(period: usize) -> Self {
        Self {
            alpha: 2.0 / (period as f64 + 1.0),
            committed: f64::NAN,
            value: f64::NAN,
            volume: 0.0,
            last_open_time: None,
        }
    }
}

impl SeriesSource for EmaSource {
    fn reset_accumulator(&mut self) {
        self.committed = f64::NAN;
        self.value = f64::NAN;
        self.last_open_time = None;
    }

    fn advance(&mut self, candle: &Candle) {
        if self.last_open_time != Some(candle.open_time) {
            self.committed = self.value;
            self.last_open_time = Some(candle.open_time);
        }
        self.value = if self.committed.is_nan() {
            candle.close
        } else {
            self.committed + self.alpha * (candle.close - self.committed)
        };
        self.volume = candle.volume;
    }

    fn create_renderers(&mut self) -> Option<RendererSet<Self>> {
        let mut renderers: RendererSet<Self> = RendererSet::new();
        renderers.push(Box::new(LineSeriesRenderer::new("ema", |s: &EmaSource| s.value)));
        renderers.push(Box::new(HistogramSeriesRenderer::new(
            "vol",
            |s: &EmaSource| s.volume,
        )));
        Some(renderers)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }
}

fn generated_history(count: usize) -> CandleHistory {
    let candles = (0..count)
        .map(|i| {
            let t = i as i64 * 60_000;
            let base = 100.0 + i as f64 * 0.05;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            Candle::new(t, t + 59_999, base, base + 1.75, base - 1.75, close, 10.0)
                .expect("valid generated candle")
        })
        .collect();
    let mut history = CandleHistory::new();
    history.set_history(candles);
    history
}

fn bench_resync_10k(c: &mut Criterion) {
    let mut history = generated_history(10_000);
    let mut painter = DataPainter::new(PainterConfig::new("EMA 20"), EmaSource::new(20));
    painter.install(&mut history).expect("install");

    c.bench_function("resync_10k", |b| {
        b.iter(|| {
            painter
                .on_history_update(black_box(HistoryUpdate::NewHistory), &history)
                .expect("resync");
        })
    });
}

fn bench_revise_tail(c: &mut Criterion) {
    let mut history = generated_history(10_000);
    let mut painter = DataPainter::new(PainterConfig::new("EMA 20"), EmaSource::new(20));
    painter.install(&mut history).expect("install");
    let open_time = 9_999 * 60_000;
    let mut close = 600.0;

    c.bench_function("revise_tail_increment", |b| {
        b.iter(|| {
            close += 0.01;
            let candle =
                Candle::new(open_time, open_time + 59_999, close, close, close, close, 1.0)
                    .expect("candle");
            history.push(candle).expect("push");
            painter.pump(&history).expect("pump");
        })
    });
}

fn bench_paint_10k(c: &mut Criterion) {
    let mut history = generated_history(10_000);
    let mut painter = DataPainter::new(PainterConfig::new("EMA 20"), EmaSource::new(20));
    painter.install(&mut history).expect("install");
    let mut view =
        ChartView::new(ChartViewConfig::new(Viewport::new(1920, 1080))).expect("view");
    view.fit_to_history(&history).expect("fit");
    let mut frame = RenderFrame::new(view.viewport());

    c.bench_function("paint_10k", |b| {
        b.iter(|| {
            frame.clear();
            painter
                .paint(black_box(&history), &view, &mut frame)
                .expect("paint");
        })
    });
}

criterion_group!(benches, bench_resync_10k, bench_revise_tail, bench_paint_10k);
criterion_main!(benches);
