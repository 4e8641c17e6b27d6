use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use chartloom::api::{
    CategoryExtents, ChartComponent, DataSource, Legend, RefreshRequest, ValueAccessor,
};
use chartloom::core::transform::cartesian_transform;
use chartloom::core::{Point, Rect, Side, Size};
use chartloom::decorations::{
    Background, CategoryAxisDecoration, HorizontalRule, ValueAxisDecoration,
};
use chartloom::render::{Geometry, PathFigure, RecordingSurface, VisualSurface};
use chartloom::series::{ColumnSeries, LineSeries, SeriesValueLabels};
use chartloom::{Chart, ChartConfig, ChartError};

type TestChart = Chart<f64, RecordingSurface>;

fn value_of() -> ValueAccessor<f64> {
    ValueAccessor::new(|value: &f64| *value)
}

fn empty_chart(items: Vec<f64>) -> TestChart {
    let mut chart =
        Chart::new(RecordingSurface::new(), ChartConfig::default()).expect("default config");
    chart.add_value_axis("values").expect("value axis");
    chart.add_category_axis("categories").expect("category axis");
    chart
        .add_data_source(DataSource::new("data").with_items(items))
        .expect("data source");
    chart
}

fn column_chart(items: Vec<f64>) -> TestChart {
    let mut chart = empty_chart(items);
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
                .with_value(value_of()),
        )
        .expect("column series");
    chart
}

fn limits(chart: &TestChart, axis: &str) -> (f64, f64) {
    let axis = chart.axis(axis).expect("axis exists");
    (axis.minimum(), axis.maximum())
}

fn first_column_start(chart: &mut TestChart) -> Point {
    let visual = chart
        .component_mut::<ColumnSeries<f64>>("columns")
        .expect("columns")
        .item_states()
        .next()
        .expect("first column")
        .visual;
    let record = chart.surface().visual(visual).expect("column record");
    match record.rendered_geometry() {
        Some(Geometry::Path(figures)) => figures[0].start,
        other => panic!("unexpected column geometry: {other:?}"),
    }
}

#[test]
fn first_refresh_lays_out_and_renders() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    let report = chart
        .refresh(Size::new(400.0, 300.0))
        .expect("refresh succeeds");

    assert!(report.rendered);
    assert_eq!(report.series_area, Rect::new(36.0, 0.0, 364.0, 272.0));
    assert_eq!(limits(&chart, "values"), (-1.0, 2.0));
    assert_eq!(limits(&chart, "categories"), (0.0, 3.0));
    assert_eq!(chart.surface().visuals_in("columns").len(), 3);
    assert!(chart.diagnostics().is_empty());
}

#[test]
fn column_geometry_is_placed_in_axis_units() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let columns = chart
        .component_mut::<ColumnSeries<f64>>("columns")
        .expect("columns");
    let states: Vec<_> = columns.item_states().copied().collect();
    assert_eq!(states.len(), 3);
    assert_eq!(states[1].category_value, 1.0);
    assert_eq!(states[1].mapped(), Point::new(1.25, -1.0));

    let record = chart.surface().visual(states[0].visual).expect("record");
    assert_eq!(
        record.geometry,
        Some(Geometry::Path(vec![PathFigure::rectangle(0.25, 1.0, 0.75, 0.0)]))
    );

    let start = first_column_start(&mut chart);
    assert_relative_eq!(start.x, 58.75, epsilon = 1e-9);
    assert_relative_eq!(start.y, 272.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn resize_only_replaces_transforms() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    chart.refresh(Size::new(400.0, 300.0)).expect("first refresh");
    let visual = chart
        .component_mut::<ColumnSeries<f64>>("columns")
        .expect("columns")
        .item_states()
        .next()
        .expect("first column")
        .visual;
    let before = chart.surface().visual(visual).expect("record").clone();
    let added = chart.surface().added_count;

    let report = chart
        .refresh(Size::new(800.0, 600.0))
        .expect("resize refresh");
    assert!(!report.rendered);
    assert_eq!(report.series_area, Rect::new(36.0, 0.0, 764.0, 572.0));

    let after = chart.surface().visual(visual).expect("record");
    assert_eq!(after.geometry, before.geometry);
    assert_ne!(after.transform, before.transform);
    assert_eq!(chart.surface().added_count, added);

    let start = first_column_start(&mut chart);
    assert_relative_eq!(start.x, 83.75, epsilon = 1e-9);
}

#[test]
fn unchanged_chart_does_not_render_twice() {
    let mut chart = column_chart(vec![1.0, 2.0]);
    assert!(chart.refresh(Size::new(400.0, 300.0)).expect("first").rendered);
    assert!(!chart.needs_render());
    assert!(!chart.refresh(Size::new(400.0, 300.0)).expect("second").rendered);

    chart.invalidate();
    assert!(chart.refresh(Size::new(400.0, 300.0)).expect("forced").rendered);
}

#[test]
fn data_changes_recycle_visuals() {
    let mut chart = column_chart(vec![1.0, 2.0, 3.0]);
    chart.refresh(Size::new(400.0, 300.0)).expect("first refresh");
    assert_eq!(chart.surface().visuals_in("columns").len(), 3);

    chart
        .data_source_mut("data")
        .expect("source")
        .push_item(4.0);
    assert!(chart.needs_render());
    assert!(chart.refresh(Size::new(400.0, 300.0)).expect("grow").rendered);
    assert_eq!(chart.surface().visuals_in("columns").len(), 4);
    assert_eq!(limits(&chart, "categories"), (0.0, 4.0));

    chart
        .data_source_mut("data")
        .expect("source")
        .set_items(Some(vec![5.0]));
    chart.refresh(Size::new(400.0, 300.0)).expect("shrink");
    assert_eq!(chart.surface().visuals_in("columns").len(), 1);
    assert_eq!(limits(&chart, "values"), (0.0, 5.0));
    assert_eq!(limits(&chart, "categories"), (0.0, 1.0));
}

#[test]
fn value_axis_decoration_labels_ticks() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let decoration = chart
        .component_mut::<ValueAxisDecoration>("value-axis")
        .expect("value decoration");
    let labels = decoration.tick_labels().to_vec();
    let bar = decoration.bar_visual().expect("bar visual");
    let texts: Vec<&str> = labels.iter().map(|label| label.text.as_str()).collect();
    assert_eq!(texts, vec!["-1", "0", "1", "2"]);

    let surface = chart.surface();
    assert_eq!(
        surface.visual(bar).expect("bar").geometry,
        Some(Geometry::Path(vec![PathFigure::rectangle(36.0, -1.0, 34.0, 2.0)]))
    );
    let top_label = surface.visual(labels[3].visual).expect("label 2");
    let position = top_label.position.expect("positioned");
    assert_relative_eq!(position.x, 0.0);
    assert_relative_eq!(position.y, -5.0, epsilon = 1e-9);
    let bottom_label = surface.visual(labels[0].visual).expect("label -1");
    assert_relative_eq!(
        bottom_label.position.expect("positioned").y,
        267.0,
        epsilon = 1e-9
    );
}

#[test]
fn category_labels_come_from_the_series() {
    let mut chart = empty_chart(vec![2.0, 4.0]);
    chart
        .add_component(CategoryAxisDecoration::new("category-axis", "categories"))
        .expect("category decoration");
    chart
        .add_component(
            LineSeries::new("line", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of())
                .with_category_label(ValueAccessor::new(|value: &f64| format!("q{value}"))),
        )
        .expect("line series");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let decoration = chart
        .component_mut::<CategoryAxisDecoration>("category-axis")
        .expect("category decoration");
    let texts: Vec<String> = decoration
        .tick_labels()
        .iter()
        .map(|label| label.text.clone())
        .collect();
    assert_eq!(texts, vec!["q2", "q4"]);
}

#[test]
fn line_series_skips_missing_values_but_keeps_their_category() {
    let mut chart = empty_chart(vec![1.0, f64::NAN, 3.0]);
    chart
        .add_component(
            LineSeries::new("line", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of())
                .with_category_label(ValueAccessor::new(|value: &f64| format!("c{value}"))),
        )
        .expect("line series");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let categories = chart.axis("categories").expect("categories");
    assert_eq!((categories.minimum(), categories.maximum()), (0.0, 2.0));
    assert_eq!(categories.label_at(1.0), Some("cNaN"));
    assert_eq!(limits(&chart, "values"), (1.0, 3.0));

    let line = chart
        .component_mut::<LineSeries<f64>>("line")
        .expect("line");
    let extents = line.extents();
    let path = line.path_visual().expect("path visual");
    assert_eq!((extents.minimum, extents.maximum), (1.0, 3.0));
    assert_eq!(extents.category_maximum, 3.0);

    let mut expected = PathFigure::new(Point::new(0.0, 1.0));
    expected.line_to(Point::new(2.0, 3.0));
    assert_eq!(
        chart.surface().visual(path).expect("path record").geometry,
        Some(Geometry::Path(vec![expected]))
    );
}

#[test]
fn value_labels_are_centered_on_their_points() {
    let mut chart = empty_chart(vec![1.0, -1.0, 2.0]);
    chart
        .add_component(
            SeriesValueLabels::new("labels", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of()),
        )
        .expect("value labels");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let labels = chart
        .component_mut::<SeriesValueLabels<f64>>("labels")
        .expect("labels");
    assert_eq!(labels.texts().collect::<Vec<_>>(), vec!["1", "-1", "2"]);
    let states: Vec<_> = labels.item_states().copied().collect();

    assert_eq!(limits(&chart, "categories"), (0.0, 3.0));
    let series_area = chart.layout().expect("layout").series_area;
    let matrix = cartesian_transform(
        series_area,
        chart.axis("categories").expect("categories"),
        chart.axis("values").expect("values"),
    )
    .expect("usable axes");

    let surface = chart.surface();
    for state in states {
        let anchor = matrix.transform_point(state.mapped());
        let size = surface.measure(state.visual);
        let position = surface
            .visual(state.visual)
            .and_then(|record| record.position)
            .expect("label positioned");
        assert_relative_eq!(position.x + size.width / 2.0, anchor.x, epsilon = 1e-9);
        assert_relative_eq!(position.y + size.height / 2.0, anchor.y, epsilon = 1e-9);
    }
}

#[test]
fn rule_widens_the_axis_and_moves_on_demand() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&requests);
    let mut rule = HorizontalRule::new("target", "values", 5.0);
    let _subscription = rule.on_refresh_request(move |request| sink.borrow_mut().push(request.clone()));
    chart.add_component(rule).expect("rule");

    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
    assert_eq!(limits(&chart, "values"), (-1.0, 5.0));

    let rule = chart
        .component_mut::<HorizontalRule>("target")
        .expect("rule");
    let line = rule.line_visual().expect("line visual");
    rule.set_value(5.0);
    assert!(!chart.needs_render());

    let rule = chart
        .component_mut::<HorizontalRule>("target")
        .expect("rule");
    rule.set_value(7.0);
    assert!(chart.needs_render());
    assert_eq!(
        *requests.borrow(),
        vec![RefreshRequest::Component("target".to_owned())]
    );

    assert!(chart.refresh(Size::new(400.0, 300.0)).expect("refresh").rendered);
    assert_eq!(limits(&chart, "values"), (-1.0, 7.0));
    assert_eq!(
        chart.surface().visual(line).expect("line record").geometry,
        Some(Geometry::Line {
            start: Point::new(0.0, 7.0),
            end: Point::new(1.0, 7.0),
        })
    );
}

#[test]
fn background_tracks_the_series_area() {
    let mut chart = column_chart(vec![1.0]);
    chart
        .add_component(Background::new("background"))
        .expect("background");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    let visual = chart
        .component_mut::<Background>("background")
        .expect("background")
        .visual()
        .expect("visual");
    let record = chart.surface().visual(visual).expect("record");
    assert_eq!(
        record.rendered_geometry(),
        Some(Geometry::Rect(Rect::new(36.0, 0.0, 364.0, 272.0)))
    );
}

#[test]
fn missing_axis_is_reported_once() {
    let mut chart = empty_chart(vec![1.0]);
    chart
        .add_component(
            ColumnSeries::new("broken", "data")
                .with_value_axis("nope")
                .with_category_axis("categories")
                .with_value(value_of()),
        )
        .expect("component is accepted");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
    chart.invalidate();
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh again");

    let problems: Vec<_> = chart.diagnostics().for_source("broken").collect();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].message, "Value axis 'nope' was not found");
    assert_eq!(problems[0].members, vec!["value_axis", "value_axis_name"]);
    assert!(chart.surface().visuals_in("broken").is_empty());
}

#[test]
fn component_waits_for_its_data_source() {
    let mut chart = empty_chart(vec![1.0]);
    let id = chart
        .add_component(
            ColumnSeries::new("late-columns", "late")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of()),
        )
        .expect("component");
    let problem = &chart.diagnostics().results()[0];
    assert_eq!(problem.message, "data source 'late' was not found");
    assert_eq!(problem.members, vec!["data_source_name"]);

    chart
        .add_data_source(DataSource::new("late").with_items(vec![2.0, 3.0]))
        .expect("late source");
    assert_eq!(
        chart.data_source("late").expect("late").renderers(),
        &[id]
    );
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
    assert_eq!(chart.surface().visuals_in("late-columns").len(), 2);
}

#[test]
fn names_must_be_unique() {
    let mut chart = column_chart(vec![1.0]);
    let duplicate = chart.add_component(ColumnSeries::new("columns", "data"));
    assert!(matches!(duplicate, Err(ChartError::DuplicateName(name)) if name == "columns"));
    assert!(matches!(
        chart.add_data_source(DataSource::new("data")),
        Err(ChartError::DuplicateName(_))
    ));
    assert!(matches!(
        chart.add_value_axis("values"),
        Err(ChartError::DuplicateName(_))
    ));
}

#[test]
fn removing_a_component_detaches_its_visuals() {
    let mut chart = column_chart(vec![1.0, 2.0]);
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
    let id = chart.component_id("columns").expect("columns id");

    let removed = chart.remove_component(id).expect("remove");
    assert_eq!(removed.name(), "columns");
    assert!(chart.surface().layer_by_name("columns").is_none());
    assert!(chart.data_source("data").expect("data").renderers().is_empty());
    assert!(chart.needs_render());
    assert!(matches!(
        chart.remove_component(id),
        Err(ChartError::UnknownComponent(_))
    ));
}

#[test]
fn layout_errors_surface_from_refresh() {
    let mut chart = column_chart(vec![1.0]);
    assert!(matches!(
        chart.refresh(Size::new(0.0, 300.0)),
        Err(ChartError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        chart.refresh(Size::new(30.0, 20.0)),
        Err(ChartError::InsufficientSpace { .. })
    ));
}

#[test]
fn decorations_declared_before_their_axes_still_claim_space() {
    let mut chart: TestChart =
        Chart::new(RecordingSurface::new(), ChartConfig::default()).expect("default config");
    chart
        .add_component(CategoryAxisDecoration::new("category-axis", "categories"))
        .expect("category decoration");
    chart
        .add_component(ValueAxisDecoration::new("value-axis", "values"))
        .expect("value decoration");
    chart.add_value_axis("values").expect("value axis");
    chart.add_category_axis("categories").expect("category axis");
    chart
        .add_data_source(DataSource::new("data").with_items(vec![1.0, -1.0, 2.0]))
        .expect("data source");
    chart
        .add_component(
            ColumnSeries::new("columns", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of()),
        )
        .expect("column series");

    for _ in 0..2 {
        let report = chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
        assert_eq!(report.series_area, Rect::new(36.0, 0.0, 364.0, 272.0));
    }
    assert!(chart.diagnostics().is_empty());
    assert_eq!(
        chart
            .component_mut::<ValueAxisDecoration>("value-axis")
            .expect("value decoration")
            .side(),
        Some(Side::Left)
    );
    let labels: Vec<String> = chart
        .component_mut::<ValueAxisDecoration>("value-axis")
        .expect("value decoration")
        .tick_labels()
        .iter()
        .map(|label| label.text.clone())
        .collect();
    assert_eq!(labels, ["-1", "0", "1", "2"]);
}

#[test]
fn decoration_without_its_axis_claims_nothing_and_reports() {
    let mut chart = empty_chart(vec![1.0]);
    chart
        .add_component(ValueAxisDecoration::new("ghost-axis", "ghost"))
        .expect("decoration is accepted");

    let report = chart.refresh(Size::new(400.0, 300.0)).expect("refresh");
    assert_eq!(report.series_area, Rect::new(0.0, 0.0, 400.0, 300.0));

    let problems: Vec<_> = chart.diagnostics().for_source("ghost-axis").collect();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].message, "Value axis 'ghost' was not found");
}

#[test]
fn legend_items_follow_declaration_order() {
    let mut chart = column_chart(vec![1.0, 2.0]);
    chart
        .add_component(
            LineSeries::new("trend", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of())
                .with_title("Trend")
                .with_stroke("accent"),
        )
        .expect("titled line");
    chart
        .add_component(
            LineSeries::new("baseline", "data")
                .with_value_axis("values")
                .with_category_axis("categories")
                .with_value(value_of()),
        )
        .expect("plain line");

    assert_eq!(
        chart.legend_items(),
        vec![
            Legend::new("Trend").with_fill("accent").with_stroke("accent"),
            Legend::new("baseline"),
        ]
    );
}

struct CategoryPadding {
    cells: f64,
}

impl ChartComponent<f64> for CategoryPadding {
    fn name(&self) -> &str {
        "padding"
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn category_extents(&self) -> Option<CategoryExtents> {
        Some(CategoryExtents::new("categories", f64::NAN, self.cells))
    }
}

#[test]
fn category_extents_widen_the_category_axis() {
    let mut chart = column_chart(vec![1.0, -1.0, 2.0]);
    chart
        .add_component(CategoryPadding { cells: 6.0 })
        .expect("padding");
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh");

    assert_eq!(limits(&chart, "categories"), (0.0, 6.0));
    assert_eq!(limits(&chart, "values"), (-1.0, 2.0));

    chart
        .component_mut::<CategoryPadding>("padding")
        .expect("padding")
        .cells = 1.0;
    chart.invalidate();
    chart.refresh(Size::new(400.0, 300.0)).expect("refresh again");
    assert_eq!(limits(&chart, "categories"), (0.0, 3.0));
}
