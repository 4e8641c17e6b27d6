use std::any::Any;

use tracing::debug;

use crate::api::{
    AxisBinding, AxisRole, ChartComponent, EnterLeaveContext, RefreshRequest, RefreshSignal,
    RenderContext, RequireEnterLeave, RequireRender, RequireTransforms, SubscriptionId,
    TransformContext, ValueExtents,
};
use crate::core::Point;
use crate::core::transform::horizontal_band_transform;
use crate::render::{Geometry, LayerId, VisualHandle};

/// Full-width line at a fixed value of a value axis.
pub struct HorizontalRule {
    name: String,
    value_axis: AxisBinding,
    value: f64,
    show_on_axis: bool,
    clip_to_data_region: bool,
    dirty: bool,
    refresh: RefreshSignal,
    layer: Option<LayerId>,
    line: Option<VisualHandle>,
}

impl HorizontalRule {
    #[must_use]
    pub fn new(name: impl Into<String>, value_axis: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value_axis: AxisBinding::named(AxisRole::Value, value_axis),
            value,
            show_on_axis: true,
            clip_to_data_region: true,
            dirty: true,
            refresh: RefreshSignal::new(),
            layer: None,
            line: None,
        }
    }

    /// When set (the default) the rule's value widens the axis limits.
    #[must_use]
    pub fn with_show_on_axis(mut self, show_on_axis: bool) -> Self {
        self.show_on_axis = show_on_axis;
        self
    }

    #[must_use]
    pub fn with_clip_to_data_region(mut self, clip: bool) -> Self {
        self.clip_to_data_region = clip;
        self
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        if self.value.to_bits() == value.to_bits() {
            return;
        }
        self.value = value;
        self.dirty = true;
        debug!(component = %self.name, value, "rule moved");
        self.refresh
            .raise(&RefreshRequest::Component(self.name.clone()));
    }

    pub fn on_refresh_request(
        &mut self,
        listener: impl FnMut(&RefreshRequest) + 'static,
    ) -> SubscriptionId {
        self.refresh.subscribe(listener)
    }

    #[must_use]
    pub fn line_visual(&self) -> Option<VisualHandle> {
        self.line
    }
}

impl<T> ChartComponent<T> for HorizontalRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn needs_render(&self) -> bool {
        self.dirty
    }

    fn as_enter_leave(&mut self) -> Option<&mut dyn RequireEnterLeave> {
        Some(self)
    }

    fn as_render(&mut self) -> Option<&mut dyn RequireRender> {
        Some(self)
    }

    fn as_transforms(&mut self) -> Option<&mut dyn RequireTransforms> {
        Some(self)
    }

    fn value_extents(&self) -> Option<ValueExtents> {
        if !self.show_on_axis || !self.value.is_finite() {
            return None;
        }
        let axis_name = self.value_axis.name()?;
        Some(ValueExtents::new(axis_name, self.value, self.value))
    }
}

impl RequireEnterLeave for HorizontalRule {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.ensure(ctx.axes, ctx.errors, &self.name);
        let layer = ctx.surface.create_layer(&self.name);
        let line = ctx.surface.allocator().allocate();
        ctx.surface.add(layer, line);
        self.layer = Some(layer);
        self.line = Some(line);
        self.dirty = true;
    }

    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.value_axis.clear();
        if let Some(layer) = self.layer.take() {
            ctx.surface.delete_layer(layer);
        }
        self.line = None;
    }
}

impl RequireRender for HorizontalRule {
    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let Some(line) = self.line else {
            return;
        };
        let Some(axis_id) = self.value_axis.ensure(ctx.axes, ctx.errors, &self.name) else {
            return;
        };
        if self.show_on_axis {
            if let Some(axis) = ctx.axes.get_mut(axis_id) {
                axis.update_limits(self.value);
            }
        }
        ctx.surface.set_geometry(
            line,
            Geometry::Line {
                start: Point::new(0.0, self.value),
                end: Point::new(1.0, self.value),
            },
        );
        self.dirty = false;
    }
}

impl RequireTransforms for HorizontalRule {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        let Some(line) = self.line else {
            return;
        };
        let Some(axis) = self
            .value_axis
            .resolved()
            .and_then(|id| ctx.axes.get(id))
        else {
            return;
        };
        if let Some(matrix) = horizontal_band_transform(ctx.series_area, axis) {
            ctx.surface.set_transform(line, matrix);
        }
        let clip = self.clip_to_data_region.then_some(ctx.series_area);
        ctx.surface.set_clip(line, clip);
    }
}
