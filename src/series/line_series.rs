use std::any::Any;

use tracing::trace;

use crate::api::{
    AxisBinding, AxisRole, ChartComponent, DataSourceRenderer, EnterLeaveContext, RenderContext,
    Legend, RenderPass, RequireEnterLeave, RequireTransforms, TransformContext, ValueAccessor,
};
use crate::core::transform::cartesian_transform;
use crate::core::{AxisId, Point};
use crate::render::{Geometry, LayerId, PathFigure, VisualHandle};
use crate::series::item_state::SeriesExtents;
use crate::series::require_value;

/// Polyline through the values of a data source.
///
/// The whole series is one path visual whose geometry is in axis units; a
/// resize only replaces its transform.
pub struct LineSeries<T> {
    name: String,
    data_source_name: String,
    title: Option<String>,
    stroke: Option<String>,
    value_axis: AxisBinding,
    category_axis: AxisBinding,
    value: Option<ValueAccessor<T>>,
    category: Option<ValueAccessor<T>>,
    category_label: Option<ValueAccessor<T>>,
    category_axis_offset: f64,
    clip_to_data_region: bool,
    extents: SeriesExtents,
    layer: Option<LayerId>,
    path: Option<VisualHandle>,
}

impl<T> LineSeries<T> {
    #[must_use]
    pub fn new(name: impl Into<String>, data_source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source_name.into(),
            title: None,
            stroke: None,
            value_axis: AxisBinding::new(AxisRole::Value),
            category_axis: AxisBinding::new(AxisRole::Category),
            value: None,
            category: None,
            category_label: None,
            category_axis_offset: 0.0,
            clip_to_data_region: true,
            extents: SeriesExtents::default(),
            layer: None,
            path: None,
        }
    }

    #[must_use]
    pub fn with_value_axis(mut self, name: impl Into<String>) -> Self {
        self.value_axis.set_name(name);
        self
    }

    #[must_use]
    pub fn with_category_axis(mut self, name: impl Into<String>) -> Self {
        self.category_axis.set_name(name);
        self
    }

    #[must_use]
    pub fn with_value(mut self, accessor: ValueAccessor<T>) -> Self {
        self.value = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_category(mut self, accessor: ValueAccessor<T>) -> Self {
        self.category = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_category_label(mut self, accessor: ValueAccessor<T>) -> Self {
        self.category_label = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_category_axis_offset(mut self, offset: f64) -> Self {
        self.category_axis_offset = offset;
        self
    }

    #[must_use]
    pub fn with_clip_to_data_region(mut self, clip: bool) -> Self {
        self.clip_to_data_region = clip;
        self
    }

    /// Legend title; the component name when unset.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Host style key for the path stroke, echoed in the legend swatch.
    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    /// Limits seen during the last pass.
    #[must_use]
    pub fn extents(&self) -> SeriesExtents {
        self.extents
    }

    #[must_use]
    pub fn path_visual(&self) -> Option<VisualHandle> {
        self.path
    }
}

impl<T: 'static> ChartComponent<T> for LineSeries<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_enter_leave(&mut self) -> Option<&mut dyn RequireEnterLeave> {
        Some(self)
    }

    fn as_transforms(&mut self) -> Option<&mut dyn RequireTransforms> {
        Some(self)
    }

    fn as_data_source_renderer(&mut self) -> Option<&mut dyn DataSourceRenderer<T>> {
        Some(self)
    }

    fn legend(&self) -> Option<Legend> {
        let mut legend = Legend::new(self.title.as_deref().unwrap_or(&self.name));
        if let Some(stroke) = &self.stroke {
            legend = legend.with_fill(stroke.clone()).with_stroke(stroke.clone());
        }
        Some(legend)
    }
}

impl<T> RequireEnterLeave for LineSeries<T> {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        self.category_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let layer = ctx.surface.create_layer(&self.name);
        let path = ctx.surface.allocator().allocate();
        ctx.surface.add(layer, path);
        self.layer = Some(layer);
        self.path = Some(path);
        trace!(component = %self.name, source = %self.data_source_name, "line series enter");
    }

    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.clear();
        self.category_axis.clear();
        if let Some(layer) = self.layer.take() {
            ctx.surface.delete_layer(layer);
        }
        self.path = None;
    }
}

impl<T> RequireTransforms for LineSeries<T> {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        let Some(path) = self.path else {
            return;
        };
        let (Some(value_id), Some(category_id)) =
            (self.value_axis.resolved(), self.category_axis.resolved())
        else {
            return;
        };
        let (Some(value_axis), Some(category_axis)) =
            (ctx.axes.get(value_id), ctx.axes.get(category_id))
        else {
            return;
        };
        if let Some(matrix) = cartesian_transform(ctx.area, category_axis, value_axis) {
            ctx.surface.set_transform(path, matrix);
        }
        let clip = self.clip_to_data_region.then_some(ctx.series_area);
        ctx.surface.set_clip(path, clip);
    }
}

impl<T> DataSourceRenderer<T> for LineSeries<T> {
    fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    fn preamble<'a>(&'a mut self, ctx: &mut RenderContext<'_>) -> Option<Box<dyn RenderPass<T> + 'a>> {
        let value_axis = self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let category_axis = self.category_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let value = require_value(self.value.as_ref(), ctx.errors, &self.name)?;
        let (value_axis, category_axis) = (value_axis?, category_axis?);
        if self.path.is_none() {
            return None;
        }
        self.extents.reset();
        Some(Box::new(LinePass {
            series: self,
            value,
            value_axis,
            category_axis,
            figure: None,
            last_index: None,
        }))
    }
}

struct LinePass<'a, T> {
    series: &'a mut LineSeries<T>,
    value: ValueAccessor<T>,
    value_axis: AxisId,
    category_axis: AxisId,
    figure: Option<PathFigure>,
    last_index: Option<usize>,
}

impl<T> RenderPass<T> for LinePass<'_, T> {
    fn render(&mut self, ctx: &mut RenderContext<'_>, index: usize, item: &T) {
        let series = &mut *self.series;
        let value = self.value.value(item);
        let category = series
            .category
            .as_ref()
            .map_or(index as f64, |accessor| accessor.value(item))
            + series.category_axis_offset;
        self.last_index = Some(index);
        series.extents.update(category, value);

        let label = series
            .category_label
            .as_ref()
            .map(|accessor| accessor.label(item));
        let Some(category_axis) = ctx.axes.get_mut(self.category_axis) else {
            return;
        };
        category_axis.update_limits(category);
        let mapped_x = match label {
            Some(label) => category_axis.map_with_label(category, label),
            None => category_axis.map(category),
        };
        if value.is_nan() || mapped_x.is_nan() {
            return;
        }

        let Some(value_axis) = ctx.axes.get_mut(self.value_axis) else {
            return;
        };
        value_axis.update_limits(value);
        let point = Point::new(mapped_x, value_axis.map(value));
        match self.figure.as_mut() {
            Some(figure) => figure.line_to(point),
            None => self.figure = Some(PathFigure::new(point)),
        }
    }

    fn render_complete(&mut self, _ctx: &mut RenderContext<'_>) {
        // Only this series' own extents get the extra cell; the category axis
        // is left as traversed, unlike columns and value labels.
        if self.series.category.is_none() {
            if let Some(last) = self.last_index {
                self.series.extents.update_category((last + 1) as f64);
            }
        }
    }

    fn postamble(self: Box<Self>, ctx: &mut RenderContext<'_>) {
        let Some(path) = self.series.path else {
            return;
        };
        let figures = self
            .figure
            .filter(|figure| !figure.segments.is_empty())
            .into_iter()
            .collect();
        ctx.surface.set_geometry(path, Geometry::Path(figures));
    }
}
