use std::any::Any;

use crate::api::{
    ChartComponent, EnterLeaveContext, RequireEnterLeave, RequireTransforms, TransformContext,
};
use crate::core::Rect;
use crate::core::transform::normalized_transform;
use crate::render::{Geometry, LayerId, VisualHandle};

/// Fills the series area; its geometry is the unit square.
pub struct Background {
    name: String,
    layer: Option<LayerId>,
    visual: Option<VisualHandle>,
}

impl Background {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer: None,
            visual: None,
        }
    }

    #[must_use]
    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }
}

impl<T> ChartComponent<T> for Background {
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
}

impl RequireEnterLeave for Background {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        let layer = ctx.surface.create_layer(&self.name);
        let visual = ctx.surface.allocator().allocate();
        ctx.surface.add(layer, visual);
        ctx.surface
            .set_geometry(visual, Geometry::Rect(Rect::new(0.0, 0.0, 1.0, 1.0)));
        self.layer = Some(layer);
        self.visual = Some(visual);
    }

    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        if let Some(layer) = self.layer.take() {
            ctx.surface.delete_layer(layer);
        }
        self.visual = None;
    }
}

impl RequireTransforms for Background {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        if let Some(visual) = self.visual {
            ctx.surface
                .set_transform(visual, normalized_transform(ctx.series_area));
        }
    }
}
