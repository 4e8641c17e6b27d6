use std::any::Any;

use tracing::trace;

use crate::api::{
    AxisBinding, AxisRole, ChartComponent, DataSourceRenderer, EnterLeaveContext, RenderContext,
    RenderPass, RequireEnterLeave, RequireTransforms, TransformContext, ValueAccessor,
};
use crate::core::transform::cartesian_transform;
use crate::core::{AxisId, Recycler};
use crate::render::{Geometry, LayerId, PathFigure, VisualHandle};
use crate::series::item_state::ItemState;
use crate::series::require_value;

const DEFAULT_BAR_OFFSET: f64 = 0.25;
const DEFAULT_BAR_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
struct ColumnItem {
    state: ItemState,
    figure: PathFigure,
}

/// One rectangle per item, from the zero baseline to the value.
pub struct ColumnSeries<T> {
    name: String,
    data_source_name: String,
    value_axis: AxisBinding,
    category_axis: AxisBinding,
    value: Option<ValueAccessor<T>>,
    category: Option<ValueAccessor<T>>,
    category_axis_offset: f64,
    bar_offset: f64,
    bar_width: f64,
    clip_to_data_region: bool,
    layer: Option<LayerId>,
    items: Vec<ColumnItem>,
}

impl<T> ColumnSeries<T> {
    #[must_use]
    pub fn new(name: impl Into<String>, data_source_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source_name.into(),
            value_axis: AxisBinding::new(AxisRole::Value),
            category_axis: AxisBinding::new(AxisRole::Category),
            value: None,
            category: None,
            category_axis_offset: 0.0,
            bar_offset: DEFAULT_BAR_OFFSET,
            bar_width: DEFAULT_BAR_WIDTH,
            clip_to_data_region: true,
            layer: None,
            items: Vec::new(),
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
    pub fn with_category_axis_offset(mut self, offset: f64) -> Self {
        self.category_axis_offset = offset;
        self
    }

    /// Bar placement inside its cell, both in cell units.
    #[must_use]
    pub fn with_bar(mut self, offset: f64, width: f64) -> Self {
        self.bar_offset = offset;
        self.bar_width = width;
        self
    }

    #[must_use]
    pub fn with_clip_to_data_region(mut self, clip: bool) -> Self {
        self.clip_to_data_region = clip;
        self
    }

    /// Items placed during the last pass, in data order.
    pub fn item_states(&self) -> impl Iterator<Item = &ItemState> {
        self.items.iter().map(|item| &item.state)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl<T: 'static> ChartComponent<T> for ColumnSeries<T> {
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
}

impl<T> RequireEnterLeave for ColumnSeries<T> {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        self.category_axis.ensure(ctx.axes, ctx.errors, &self.name);
        self.layer = Some(ctx.surface.create_layer(&self.name));
        trace!(component = %self.name, source = %self.data_source_name, "column series enter");
    }

    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.clear();
        self.category_axis.clear();
        if let Some(layer) = self.layer.take() {
            ctx.surface.delete_layer(layer);
        }
        self.items.clear();
    }
}

impl<T> RequireTransforms for ColumnSeries<T> {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        if self.items.is_empty() {
            return;
        }
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
        let Some(matrix) = cartesian_transform(ctx.area, category_axis, value_axis) else {
            return;
        };
        let clip = self.clip_to_data_region.then_some(ctx.series_area);
        for item in &self.items {
            ctx.surface.set_transform(item.state.visual, matrix);
            ctx.surface.set_clip(item.state.visual, clip);
        }
    }
}

impl<T> DataSourceRenderer<T> for ColumnSeries<T> {
    fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    fn preamble<'a>(&'a mut self, ctx: &mut RenderContext<'_>) -> Option<Box<dyn RenderPass<T> + 'a>> {
        let value_axis = self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let category_axis = self.category_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let value = require_value(self.value.as_ref(), ctx.errors, &self.name)?;
        let (value_axis, category_axis) = (value_axis?, category_axis?);
        let layer = self.layer?;

        let allocator = ctx.surface.allocator();
        let recycler = Recycler::new(
            self.items.iter().map(|item| item.state.visual).collect::<Vec<_>>(),
            move || allocator.allocate(),
        );
        Some(Box::new(ColumnPass {
            series: self,
            value,
            value_axis,
            category_axis,
            layer,
            recycler,
            items: Vec::new(),
            last_index: None,
        }))
    }
}

struct ColumnPass<'a, T, F>
where
    F: FnMut() -> VisualHandle,
{
    series: &'a mut ColumnSeries<T>,
    value: ValueAccessor<T>,
    value_axis: AxisId,
    category_axis: AxisId,
    layer: LayerId,
    recycler: Recycler<VisualHandle, F>,
    items: Vec<ColumnItem>,
    last_index: Option<usize>,
}

impl<T, F> RenderPass<T> for ColumnPass<'_, T, F>
where
    F: FnMut() -> VisualHandle,
{
    fn render(&mut self, ctx: &mut RenderContext<'_>, index: usize, item: &T) {
        self.last_index = Some(index);
        let value = self.value.value(item);
        if value.is_nan() {
            return;
        }
        let series = &*self.series;
        let category = series
            .category
            .as_ref()
            .map_or(index as f64, |accessor| accessor.value(item))
            + series.category_axis_offset;
        if category.is_nan() {
            return;
        }

        let Some(value_axis) = ctx.axes.get_mut(self.value_axis) else {
            return;
        };
        value_axis.update_limits(value);
        value_axis.update_limits(0.0);
        let top = value_axis.map(value);
        let baseline = value_axis.map(0.0);

        let Some(category_axis) = ctx.axes.get_mut(self.category_axis) else {
            return;
        };
        category_axis.update_limits(category);
        let left = category_axis.map(category) + series.bar_offset;
        let right = left + series.bar_width;

        let visual = self.recycler.next_item();
        self.items.push(ColumnItem {
            state: ItemState {
                index,
                category_value: category,
                mapped_x: left,
                mapped_y: top,
                visual,
            },
            figure: PathFigure::rectangle(left, top.max(baseline), right, top.min(baseline)),
        });
    }

    fn render_complete(&mut self, ctx: &mut RenderContext<'_>) {
        if self.series.category.is_some() {
            return;
        }
        let Some(last) = self.last_index else {
            return;
        };
        // One extra cell so the last column has room: the axis spans the
        // item count.
        if let Some(category_axis) = ctx.axes.get_mut(self.category_axis) {
            category_axis.update_limits((last + 1) as f64);
        }
    }

    fn postamble(self: Box<Self>, ctx: &mut RenderContext<'_>) {
        let Self {
            series,
            layer,
            recycler,
            items,
            ..
        } = *self;
        let recycled = recycler.finish();
        for visual in &recycled.unused {
            ctx.surface.remove(layer, *visual);
        }
        for visual in &recycled.created {
            ctx.surface.add(layer, *visual);
        }
        for item in &items {
            ctx.surface
                .set_geometry(item.state.visual, Geometry::Path(vec![item.figure.clone()]));
        }
        trace!(
            component = %series.name,
            items = items.len(),
            created = recycled.created.len(),
            removed = recycled.unused.len(),
            "column series committed"
        );
        series.items = items;
    }
}
