use chartloom::api::{DataSource, ValueAccessor};
use chartloom::core::{Axis, Size, TickCalculator};
use chartloom::decorations::{CategoryAxisDecoration, ValueAxisDecoration};
use chartloom::render::RecordingSurface;
use chartloom::series::{ColumnSeries, LineSeries};
use chartloom::{Chart, ChartConfig};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            100.0 + (t * 0.05).sin() * 25.0 + t * 0.01
        })
        .collect()
}

fn bench_tick_calculation(c: &mut Criterion) {
    c.bench_function("tick_calculation", |b| {
        b.iter(|| {
            let ticks = TickCalculator::new(black_box(-5.25), black_box(4_321.0), 5).collect_ticks();
            black_box(ticks);
        })
    });
}

fn bench_axis_limits_10k(c: &mut Criterion) {
    let values = wave(10_000);
    c.bench_function("axis_limits_10k", |b| {
        b.iter(|| {
            let mut axis = Axis::value("values");
            for value in &values {
                axis.update_limits(black_box(*value));
            }
            black_box(axis.range());
        })
    });
}

fn build_chart(items: Vec<f64>) -> Chart<f64, RecordingSurface> {
    let mut chart = Chart::new(RecordingSurface::new(), ChartConfig::default()).expect("chart init");
    chart.add_value_axis("values").expect("value axis");
    chart.add_category_axis("categories").expect("category axis");
    chart
        .add_data_source(DataSource::new("data").with_items(items))
        .expect("data source");
    chart
        .add_component(CategoryAxisDecoration::new("category-axis", "categories"))
        .expect("category decoration");
    chart
        .add_component(ValueAxisDecoration::new("value-axis", "values"))
        .expect("value decoration");
    chart
        .add_component(
            ColumnSeries::new("columns", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(ValueAccessor::new(|value: &f64| *value)),
        )
        .expect("columns");
    chart
        .add_component(
            LineSeries::new("line", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(ValueAccessor::new(|value: &f64| *value)),
        )
        .expect("line");
    chart
}

fn bench_full_render_10k(c: &mut Criterion) {
    let mut chart = build_chart(wave(10_000));
    c.bench_function("full_render_10k", |b| {
        b.iter(|| {
            chart.invalidate();
            let report = chart
                .refresh(black_box(Size::new(1920.0, 1080.0)))
                .expect("refresh");
            black_box(report);
        })
    });
}

fn bench_resize_only_10k(c: &mut Criterion) {
    let mut chart = build_chart(wave(10_000));
    chart
        .refresh(Size::new(1920.0, 1080.0))
        .expect("initial refresh");
    let mut wide = false;
    c.bench_function("resize_only_10k", |b| {
        b.iter(|| {
            wide = !wide;
            let width = if wide { 1920.0 } else { 1280.0 };
            let report = chart
                .refresh(black_box(Size::new(width, 1080.0)))
                .expect("refresh");
            black_box(report);
        })
    });
}

criterion_group!(
    benches,
    bench_tick_calculation,
    bench_axis_limits_10k,
    bench_full_render_10k,
    bench_resize_only_10k
);
criterion_main!(benches);
