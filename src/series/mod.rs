mod column_series;
mod item_state;
mod line_series;
mod value_labels;

pub use column_series::ColumnSeries;
pub use item_state::{ItemState, SeriesExtents};
pub use line_series::LineSeries;
pub use value_labels::SeriesValueLabels;

use crate::api::{ChartValidationResult, ErrorReporter, ValueAccessor};

/// Bound value accessor, or a reported problem.
pub(crate) fn require_value<T>(
    accessor: Option<&ValueAccessor<T>>,
    errors: &mut dyn ErrorReporter,
    component: &str,
) -> Option<ValueAccessor<T>> {
    if accessor.is_none() {
        errors.report(
            ChartValidationResult::new(component, "value accessor is not set")
                .with_members(["value"]),
        );
    }
    accessor.cloned()
}
