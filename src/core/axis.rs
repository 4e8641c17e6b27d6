use std::collections::BTreeMap;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::ticks::{DEFAULT_MAX_TICKS, TickCalculator, TickSet};
use crate::error::{ChartError, ChartResult};

/// Allowed axis types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisType {
    /// Cell-counting axis; usually the X coordinate.
    Category,
    /// Continuous axis; usually the Y coordinate.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrientation {
    Horizontal,
    Vertical,
}

/// Side of the remaining layout rectangle a component attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
    /// No fixed side; claims no space.
    Float,
}

/// Stateful coordinate mapper shared by every component bound to it.
///
/// Limits start unset (NaN), are cleared at the start of every full render
/// and only ever widen while a render pass runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    name: String,
    axis_type: AxisType,
    orientation: AxisOrientation,
    side: Side,
    minimum: f64,
    maximum: f64,
    max_ticks: usize,
    labels: BTreeMap<OrderedFloat<f64>, String>,
}

impl Axis {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        axis_type: AxisType,
        orientation: AxisOrientation,
        side: Side,
    ) -> Self {
        Self {
            name: name.into(),
            axis_type,
            orientation,
            side,
            minimum: f64::NAN,
            maximum: f64::NAN,
            max_ticks: DEFAULT_MAX_TICKS,
            labels: BTreeMap::new(),
        }
    }

    /// Value / vertical / left axis.
    #[must_use]
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, AxisType::Value, AxisOrientation::Vertical, Side::Left)
    }

    /// Category / horizontal / bottom axis.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self::new(
            name,
            AxisType::Category,
            AxisOrientation::Horizontal,
            Side::Bottom,
        )
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks.max(1);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn axis_type(&self) -> AxisType {
        self.axis_type
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[must_use]
    pub fn max_ticks(&self) -> usize {
        self.max_ticks
    }

    /// Extent in axis units; category axes count cells, so one is added.
    #[must_use]
    pub fn range(&self) -> f64 {
        if self.minimum.is_nan() || self.maximum.is_nan() {
            return f64::NAN;
        }
        match self.axis_type {
            AxisType::Value => self.maximum - self.minimum,
            AxisType::Category => self.maximum - self.minimum + 1.0,
        }
    }

    #[must_use]
    pub fn has_limits(&self) -> bool {
        !self.minimum.is_nan() && !self.maximum.is_nan()
    }

    pub fn reset_limits(&mut self) {
        self.minimum = f64::NAN;
        self.maximum = f64::NAN;
        self.labels.clear();
    }

    pub fn update_limits(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        if self.minimum.is_nan() || value < self.minimum {
            self.minimum = value;
        }
        if self.maximum.is_nan() || value > self.maximum {
            self.maximum = value;
        }
    }

    /// Maps a raw value into axis-local units.
    ///
    /// Axis-local units are the data units themselves: scaling into the
    /// layout rectangle happens in the transforms phase, so geometry built
    /// from these values survives a resize.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        value
    }

    /// Category form of [`Axis::map`] that also registers a tick label.
    pub fn map_with_label(&mut self, value: f64, label: impl Into<String>) -> f64 {
        if value.is_finite() {
            self.labels.insert(OrderedFloat(value), label.into());
        }
        self.map(value)
    }

    #[must_use]
    pub fn label_at(&self, value: f64) -> Option<&str> {
        self.labels.get(&OrderedFloat(value)).map(String::as_str)
    }

    /// Registered labels in ascending axis order.
    pub fn labels(&self) -> impl Iterator<Item = (f64, &str)> {
        self.labels
            .iter()
            .map(|(value, label)| (value.into_inner(), label.as_str()))
    }

    /// Nice ticks for an arbitrary range using this axis' tick budget.
    #[must_use]
    pub fn compute_ticks(&self, minimum: f64, maximum: f64) -> TickSet {
        TickCalculator::new(minimum, maximum, self.max_ticks).collect_ticks()
    }

    /// Tick generator over the current limits.
    #[must_use]
    pub fn tick_calculator(&self) -> TickCalculator {
        TickCalculator::new(self.minimum, self.maximum, self.max_ticks)
    }
}

/// Stable handle of an axis inside an [`AxisSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisId(usize);

impl AxisId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Name-indexed axes of one chart, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AxisSet {
    axes: IndexMap<String, Axis>,
}

impl AxisSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, axis: Axis) -> ChartResult<AxisId> {
        if axis.name().is_empty() {
            return Err(ChartError::InvalidConfig(
                "axis name must not be empty".to_owned(),
            ));
        }
        if self.axes.contains_key(axis.name()) {
            return Err(ChartError::DuplicateName(axis.name().to_owned()));
        }
        let (index, _) = self.axes.insert_full(axis.name().to_owned(), axis);
        Ok(AxisId(index))
    }

    /// Resolves an axis name; `None` when no axis has that name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<AxisId> {
        self.axes.get_index_of(name).map(AxisId)
    }

    #[must_use]
    pub fn get(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get_index(id.0).map(|(_, axis)| axis)
    }

    pub fn get_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.get_index_mut(id.0).map(|(_, axis)| axis)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Axis> {
        self.axes.get(name)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Axis> {
        self.axes.get_mut(name)
    }

    pub fn reset_all(&mut self) {
        for axis in self.axes.values_mut() {
            axis.reset_limits();
        }
        trace!(count = self.axes.len(), "reset axis limits");
    }

    pub fn iter(&self) -> impl Iterator<Item = (AxisId, &Axis)> {
        self.axes
            .values()
            .enumerate()
            .map(|(index, axis)| (AxisId(index), axis))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}
