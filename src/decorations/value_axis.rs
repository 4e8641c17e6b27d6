use std::any::Any;
use std::rc::Rc;

use tracing::trace;

use crate::api::{
    AxisBinding, AxisRole, AxisStyle, ChartComponent, EnterLeaveContext, RenderContext,
    RenderStage, RequireEnterLeave, RequireLayout, RequireRender, RequireTransforms,
    TransformContext,
};
use crate::core::transform::value_axis_bar_transform;
use crate::core::{AxisSet, ComponentId, LayoutContext, Point, Recycler, Side};
use crate::decorations::{TickLabel, commit_tick_labels};
use crate::error::ChartResult;
use crate::render::{Geometry, LayerId, PathFigure, VisualHandle};

/// Axis line and tick labels for a value axis, on the axis' side.
pub struct ValueAxisDecoration {
    name: String,
    axis: AxisBinding,
    style: Option<AxisStyle>,
    font_size_px: Option<f64>,
    formatter: Rc<dyn Fn(f64) -> String>,
    side: Option<Side>,
    layer: Option<LayerId>,
    bar: Option<VisualHandle>,
    labels: Vec<TickLabel>,
}

impl ValueAxisDecoration {
    #[must_use]
    pub fn new(name: impl Into<String>, axis: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axis: AxisBinding::named(AxisRole::Value, axis),
            style: None,
            font_size_px: None,
            formatter: Rc::new(|value| format!("{value}")),
            side: None,
            layer: None,
            bar: None,
            labels: Vec::new(),
        }
    }

    /// Overrides the chart-wide axis style.
    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = Some(font_size_px);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Fn(f64) -> String + 'static) -> Self {
        self.formatter = Rc::new(formatter);
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

    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.side
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

impl<T> ChartComponent<T> for ValueAxisDecoration {
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

impl RequireEnterLeave for ValueAxisDecoration {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>) {
        self.style.get_or_insert(ctx.config.axis_style);
        self.font_size_px
            .get_or_insert(ctx.config.label_style.font_size_px);
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

impl RequireLayout for ValueAxisDecoration {
    fn layout(
        &mut self,
        id: ComponentId,
        ctx: &mut LayoutContext,
        axes: &AxisSet,
    ) -> ChartResult<()> {
        if let Some(side) = self.resolve_side(axes) {
            ctx.claim_space(id, side, self.style().vertical_claim())?;
        }
        Ok(())
    }
}

impl RequireRender for ValueAxisDecoration {
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
        if !axis.has_limits() {
            ctx.surface.set_geometry(bar, Geometry::Path(Vec::new()));
            let stale = std::mem::take(&mut self.labels);
            for label in stale {
                ctx.surface.remove(layer, label.visual);
            }
            return;
        }

        let style = self.style();
        let width = ctx.area.width;
        let (x1, x2) = if axis.side() == Side::Right {
            (0.0, style.line_thickness)
        } else {
            (width, width - style.line_thickness)
        };
        ctx.surface.set_geometry(
            bar,
            Geometry::Path(vec![PathFigure::rectangle(
                x1,
                axis.minimum(),
                x2,
                axis.maximum(),
            )]),
        );

        let allocator = ctx.surface.allocator();
        let mut recycler = Recycler::new(
            self.labels.iter().map(|label| label.visual).collect::<Vec<_>>(),
            move || allocator.allocate(),
        );
        let labels: Vec<TickLabel> = axis
            .tick_calculator()
            .ticks()
            .zip(recycler.items())
            .map(|(value, visual)| {
                let text = (self.formatter)(value);
                ctx.surface.set_text(visual, &text);
                TickLabel {
                    value,
                    visual,
                    text,
                }
            })
            .collect();
        commit_tick_labels(ctx.surface, layer, recycler.finish());
        trace!(component = %self.name, ticks = labels.len(), "value axis rendered");
        self.labels = labels;
    }
}

impl RequireTransforms for ValueAxisDecoration {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>) {
        let Some(bar) = self.bar else {
            return;
        };
        let Some(axis) = self.axis.resolved().and_then(|id| ctx.axes.get(id)) else {
            return;
        };
        let style = self.style();
        let Some(matrix) = value_axis_bar_transform(ctx.area, axis, style.margin, axis.side())
        else {
            return;
        };
        ctx.surface.set_transform(bar, matrix);

        let scale_y = ctx.area.height / axis.range();
        let half_font = self.font_size_px.unwrap_or_default() / 2.0;
        for label in &self.labels {
            let top = ctx.area.bottom() - (label.value - axis.minimum()) * scale_y - half_font;
            ctx.surface
                .set_position(label.visual, Point::new(ctx.area.left, top));
        }
    }
}
