use std::any::Any;

use tracing::trace;

use crate::api::{
    AxisBinding, AxisRole, AxisStyle, ChartComponent, EnterLeaveContext, RenderContext,
    RenderStage, RequireEnterLeave, RequireLayout, RequireRender, RequireTransforms,
    TransformContext,
};
use crate::core::transform::category_axis_bar_transform;
use crate::core::{AxisSet, ComponentId, LayoutContext, Point, Recycler, Side};
use crate::decorations::{TickLabel, commit_tick_labels};
use crate::error::ChartResult;
use crate::render::{Geometry, LayerId, PathFigure, VisualHandle};

/// Axis line and category labels for a category axis.
///
/// Labels are the ones series registered on the axis during the last pass,
/// centered in their cell.
pub struct CategoryAxisDecoration {
    name: String,
    axis: AxisBinding,
    style: Option<AxisStyle>,
    side: Option<Side>,
    layer: Option<LayerId>,
    bar: Option<VisualHandle>,
    labels: Vec<TickLabel>,
}

impl CategoryAxisDecoration {
    #[must_use]
    pub fn new(name: impl Into<String>, axis: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis: AxisBinding::named(AxisRole::Category, axis),
            style: None,
            side: None,
            layer: None,
            bar: None,
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn tick_labels(&self) -> &[TickLabel] {
        &self.labels
    }

    #[must_use]
    pub fn bar_visual(&self) -> Option<VisualHandle> {
        self.bar
    }

    fn style(&self) -> AxisStyle {
        self.style.unwrap_or_default()
    }

    /// The axis may be registered after this decoration; keep looking it up
    /// until it appears.
    fn resolve_side(&mut self, axes: &AxisSet) -> Option<Side> {
        if self.side.is_none() {
            self.side = self
                .axis
                .lookup(axes)
                .and_then(|id| axes.get(id))
                .map(|axis| axis.side());
        }
        self.side
    }
}

impl<T> ChartComponent<T> for CategoryAxisDecoration {
    fn name(&self) -> &str {
        &self.name
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_enter_leave(&mut self) -> Option<&mut dyn RequireEnterLeave> {
        Some(self)
    }

    fn as_layout(&mut self) -> Option<&mut dyn RequireLayout> {
        Some(self)
    }

    fn as_render(&mut self) -> Option<&mut dyn RequireRender> {
        Some(self)
    }

    fn as_transforms(&mut self) -> Option<&mut dyn RequireTransforms> {
        Some(self)
    }
}

impl RequireEnterLeave for CategoryAxisDecoration {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.style.get_or_insert(ctx.config.axis_style);
        self.resolve_side(ctx.axes);

        let layer = ctx.surface.create_layer(&self.name);
        let bar = ctx.surface.allocator().allocate();
        ctx.surface.add(layer, bar);
        self.layer = Some(layer);
        self.bar = Some(bar);
    }

    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.axis.clear();
        self.side = None;
        if let Some(layer) = self.layer.take() {
            ctx.surface.delete_layer(layer);
        }
        self.bar = None;
        self.labels.clear();
    }
}

impl RequireLayout for CategoryAxisDecoration {
    fn layout(
        &mut self,
        id: ComponentId,
        ctx: &mut LayoutContext,
        axes: &AxisSet,
    ) -> ChartResult<()> {
        if let Some(side) = self.resolve_side(axes) {
            ctx.claim_space(id, side, self.style().horizontal_claim())?;
        }
        Ok(())
    }
}

impl RequireRender for CategoryAxisDecoration {
    fn render_stage(&self) -> RenderStage {
        RenderStage::Axes
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let (Some(layer), Some(bar)) = (self.layer, self.bar) else {
            return;
        };
        let Some(axis) = self
            .axis
            .ensure(ctx.axes, ctx.errors, &self.name)
            .and_then(|id| ctx.axes.get(id))
        else {
            return;
        };
        self.side = Some(axis.side());

        let style = self.style();
        let allocator = ctx.surface.allocator();
        let mut recycler = Recycler::new(
            self.labels.iter().map(|label| label.visual).collect::<Vec<_>>(),
            move || allocator.allocate(),
        );
        if axis.has_limits() {
            let height = ctx.area.height;
            let (y1, y2) = if axis.side() == Side::Top {
                (height, height - style.line_thickness)
            } else {
                (0.0, style.line_thickness)
            };
            ctx.surface.set_geometry(
                bar,
                Geometry::Path(vec![PathFigure::rectangle(
                    axis.minimum(),
                    y1,
                    axis.maximum() + 1.0,
                    y2,
                )]),
            );
        } else {
            ctx.surface.set_geometry(bar, Geometry::Path(Vec::new()));
        }

        let labels: Vec<TickLabel> = axis
            .labels()
            .zip(recycler.items())
            .map(|((value, text), visual)| {
                ctx.surface.set_text(visual, text);
                TickLabel {
                    value,
                    visual,
                    text: text.to_owned(),
                }
            })
            .collect();
        commit_tick_labels(ctx.surface, layer, recycler.finish());
        trace!(component = %self.name, labels = labels.len(), "category axis rendered");
        self.labels = labels;
    }
}

impl RequireTransforms for CategoryAxisDecoration {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        let Some(bar) = self.bar else {
            return;
        };
        let Some(axis) = self.axis.resolved().and_then(|id| ctx.axes.get(id)) else {
            return;
        };
        let style = self.style();
        let Some(matrix) = category_axis_bar_transform(ctx.area, axis, style.margin, axis.side())
        else {
            return;
        };
        ctx.surface.set_transform(bar, matrix);

        let scale_x = ctx.area.width / axis.range();
        let band = style.margin + style.line_thickness;
        for label in &self.labels {
            let size = ctx.surface.measure(label.visual);
            let center = ctx.area.left + (label.value - axis.minimum() + 0.5) * scale_x;
            let top = if axis.side() == Side::Top {
                ctx.area.bottom() - band - size.height
            } else {
                ctx.area.top + band
            };
            ctx.surface
                .set_position(label.visual, Point::new(center - size.width / 2.0, top));
        }
    }
}
