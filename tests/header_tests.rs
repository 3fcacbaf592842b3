mod support;

use chart_painter::api::{ChartView, ChartViewConfig, Selection};
use chart_painter::core::{CandleHistory, HistorySource, Point, Viewport};
use chart_painter::interaction::CursorState;
use chart_painter::render::RenderFrame;
use chart_painter::{DataPainter, PainterConfig};

use support::{RecordingSource, candle, history_of, minute};

fn view_over(history: &CandleHistory) -> ChartView {
    let mut view =
        ChartView::new(ChartViewConfig::new(Viewport::new(800, 400))).expect("view init");
    view.fit_to_history(history).expect("fit");
    view
}

fn select(view: &mut ChartView, history: &CandleHistory, index: usize) {
    let candle = history.get(index).expect("candle");
    view.set_selection(Some(Selection {
        candle,
        location: Point::new(view.x_at(index).expect("x"), 100.0),
    }));
}

fn paint(painter: &mut DataPainter<RecordingSource>, history: &CandleHistory, view: &ChartView) {
    let mut frame = RenderFrame::new(view.viewport());
    painter.paint(history, view, &mut frame).expect("paint");
}

#[test]
fn header_wraps_fragments_in_brackets_after_description() {
    let mut history = history_of(4);
    let mut painter = DataPainter::new(PainterConfig::new("EMA 9"), RecordingSource::new(2));
    painter.install(&mut history).expect("install");
    let mut view = view_over(&history);
    select(&mut view, &history, 2);

    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "EMA 9[s0=102 s1=102]");
}

#[test]
fn header_without_fragments_is_the_bare_description() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(
        PainterConfig::new("  volume  "),
        RecordingSource::new(1).silent(),
    );
    painter.install(&mut history).expect("install");
    let mut view = view_over(&history);
    select(&mut view, &history, 0);

    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "volume");
}

#[test]
fn header_is_empty_without_selection() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(1));
    painter.install(&mut history).expect("install");
    let mut view = view_over(&history);
    select(&mut view, &history, 1);
    paint(&mut painter, &history, &view);
    assert!(!painter.header().is_empty());

    view.set_selection(None);
    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "");
}

#[test]
fn hidden_header_stays_empty_with_selection() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(
        PainterConfig::new("close").with_show_header(false),
        RecordingSource::new(1),
    );
    painter.install(&mut history).expect("install");
    let mut view = view_over(&history);
    select(&mut view, &history, 1);

    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "");
}

#[test]
fn selection_outside_history_yields_empty_header() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(1));
    painter.install(&mut history).expect("install");
    let view_history = history_of(3);
    let mut view = view_over(&view_history);
    view.set_selection(Some(Selection {
        candle: candle(minute(99), 1.0),
        location: Point::new(10.0, 10.0),
    }));

    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "");
}

#[test]
fn header_follows_revised_last_candle() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(1));
    painter.install(&mut history).expect("install");
    history.push(candle(minute(2), 7.5)).expect("revise");
    painter.pump(&history).expect("pump");

    let mut view = view_over(&history);
    let mut cursor = CursorState::default();
    cursor.pointer_move(799.0, 200.0);
    assert!(cursor.apply(&mut view, &history));

    paint(&mut painter, &history, &view);

    assert_eq!(painter.header(), "close[s0=7.5]");
}

#[test]
fn painting_before_install_draws_nothing() {
    let history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(1));
    let mut view = view_over(&history);
    select(&mut view, &history, 0);
    let mut frame = RenderFrame::new(view.viewport());

    painter.paint(&history, &view, &mut frame).expect("paint");

    assert!(frame.is_empty());
    assert!(painter.source().journal.borrow().is_empty());
    assert_eq!(painter.header(), "close");
}

#[test]
fn paint_visits_every_committed_index_in_order() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(2));
    painter.install(&mut history).expect("install");
    let journal = painter.source().journal.clone();
    journal.borrow_mut().clear();
    let view = view_over(&history);

    paint(&mut painter, &history, &view);

    let painted: Vec<_> = journal
        .borrow()
        .iter()
        .filter_map(|entry| match entry {
            support::Entry::Paint { slot, index } => Some((*index, *slot)),
            _ => None,
        })
        .collect();
    assert_eq!(painted, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]);
}

#[test]
fn failed_paint_keeps_previous_header() {
    let mut history = history_of(3);
    let mut painter = DataPainter::new(PainterConfig::new("close"), RecordingSource::new(1));
    painter.install(&mut history).expect("install");
    let mut view = view_over(&history);
    select(&mut view, &history, 1);
    paint(&mut painter, &history, &view);
    assert_eq!(painter.header(), "close[s0=101]");

    painter.source().fail_paint.set(true);
    select(&mut view, &history, 2);
    let mut frame = RenderFrame::new(view.viewport());

    assert!(painter.paint(&history, &view, &mut frame).is_err());
    assert_eq!(painter.header(), "close[s0=101]");
}
