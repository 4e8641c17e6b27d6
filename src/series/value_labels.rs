use std::any::Any;
use std::rc::Rc;

use tracing::trace;

use crate::api::{
    AxisBinding, AxisRole, ChartComponent, DataSourceRenderer, EnterLeaveContext, RenderContext,
    RenderPass, RequireEnterLeave, RequireTransforms, TransformContext, ValueAccessor,
};
use crate::core::transform::cartesian_transform;
use crate::core::{AxisId, Point, Recycler};
use crate::render::{LayerId, VisualHandle};
use crate::series::item_state::ItemState;
use crate::series::require_value;

type LabelFormatter = Rc<dyn Fn(f64) -> String>;

#[derive(Debug, Clone, PartialEq)]
struct LabelItem {
    state: ItemState,
    text: String,
}

/// Text label at each value of a data source.
///
/// Labels are centered on their data point; `label_offset` shifts them in
/// units of the measured label size (`(0, -1)` puts the label one full
/// height above the point).
pub struct SeriesValueLabels<T> {
    name: String,
    data_source_name: String,
    value_axis: AxisBinding,
    category_axis: AxisBinding,
    value: Option<ValueAccessor<T>>,
    category: Option<ValueAccessor<T>>,
    category_axis_offset: f64,
    label_offset: Point,
    formatter: LabelFormatter,
    layer: Option<LayerId>,
    items: Vec<LabelItem>,
}

impl<T> SeriesValueLabels<T> {
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
            label_offset: Point::default(),
            formatter: Rc::new(|value| format!("{value}")),
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

    #[must_use]
    pub fn with_label_offset(mut self, offset: Point) -> Self {
        self.label_offset = offset;
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Fn(f64) -> String + 'static) -> Self {
        self.formatter = Rc::new(formatter);
        self
    }

    pub fn item_states(&self) -> impl Iterator<Item = &ItemState> {
        self.items.iter().map(|item| &item.state)
    }

    /// Label texts placed during the last pass, in data order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.text.as_str())
    }
}

impl<T: 'static> ChartComponent<T> for SeriesValueLabels<T> {
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

impl<T> RequireEnterLeave for SeriesValueLabels<T> {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        self.category_axis.ensure(ctx.axes, ctx.errors, &self.name);
        self.layer = Some(ctx.surface.create_layer(&self.name));
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

impl<T> RequireTransforms for SeriesValueLabels<T> {
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
        for item in &self.items {
            let anchor = matrix.transform_point(item.state.mapped());
            let size = ctx.surface.measure(item.state.visual);
            let left = anchor.x - size.width / 2.0 + size.width * self.label_offset.x;
            let top = anchor.y - size.height / 2.0 + size.height * self.label_offset.y;
            ctx.surface
                .set_position(item.state.visual, Point::new(left, top));
        }
    }
}

impl<T> DataSourceRenderer<T> for SeriesValueLabels<T> {
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
        Some(Box::new(LabelPass {
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

struct LabelPass<'a, T, F>
where
    F: FnMut() -> VisualHandle,
{
    series: &'a mut SeriesValueLabels<T>,
    value: ValueAccessor<T>,
    value_axis: AxisId,
    category_axis: AxisId,
    layer: LayerId,
    recycler: Recycler<VisualHandle, F>,
    items: Vec<LabelItem>,
    last_index: Option<usize>,
}

impl<T, F> RenderPass<T> for LabelPass<'_, T, F>
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
        let mapped_y = value_axis.map(value);
        let Some(category_axis) = ctx.axes.get_mut(self.category_axis) else {
            return;
        };
        category_axis.update_limits(category);
        let mapped_x = category_axis.map(category);

        let visual = self.recycler.next_item();
        let text = (series.formatter)(value);
        ctx.surface.set_text(visual, &text);
        self.items.push(LabelItem {
            state: ItemState {
                index,
                category_value: category,
                mapped_x,
                mapped_y,
                visual,
            },
            text,
        });
    }

    fn render_complete(&mut self, ctx: &mut RenderContext<'_>) {
        if self.series.category.is_some() {
            return;
        }
        if let (Some(last), Some(category_axis)) =
            (self.last_index, ctx.axes.get_mut(self.category_axis))
        {
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
        trace!(
            component = %series.name,
            labels = items.len(),
            "value labels committed"
        );
        series.items = items;
    }
}
