//! Scroll animator benchmark: per-tick offset update and cycle width.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tickertape::ticker::next_offset;
use tickertape::{FontMetrics, ScrollState, TickerString};

fn advance_offset(c: &mut Criterion) {
    c.bench_function("next_offset", |b| {
        let mut offset = 0.0;
        b.iter(|| {
            offset = next_offset(black_box(offset), black_box(1234.0), black_box(5.0));
            offset
        });
    });
}

fn tick_with_cycle_width(c: &mut Criterion) {
    let ticker = TickerString::from_unit("AAPL: $150.25   MSFT: $410.10   BTC-USD: $64000.00   ");
    let metrics = FontMetrics::TERMINAL;
    let mut scroll = ScrollState::new(5.0);

    c.bench_function("scroll_tick", |b| {
        b.iter(|| scroll.advance(black_box(&ticker).cycle_width(metrics)));
    });
}

criterion_group!(benches, advance_offset, tick_with_cycle_width);
criterion_main!(benches);
