use std::any::Any;

use crate::api::chart_config::ChartConfig;
use crate::api::data_source::DataSourceRenderer;
use crate::api::diagnostics::ErrorReporter;
use crate::api::legend::Legend;
use crate::core::{AxisSet, ComponentId, LayoutContext, Rect, Size};
use crate::error::ChartResult;
use crate::render::VisualSurface;

/// Anything placed on a chart.
///
/// A component advertises the phases it takes part in by returning itself
/// from the matching `as_*` hook; the chart dispatches each phase to the
/// components that opted in, in declaration order.
pub trait ChartComponent<T> {
    fn name(&self) -> &str;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// `true` when the component changed since the last render pass.
    fn needs_render(&self) -> bool {
        false
    }

    fn as_enter_leave(&mut self) -> Option<&mut dyn RequireEnterLeave> {
        None
    }

    fn as_layout(&mut self) -> Option<&mut dyn RequireLayout> {
        None
    }

    fn as_render(&mut self) -> Option<&mut dyn RequireRender> {
        None
    }

    fn as_transforms(&mut self) -> Option<&mut dyn RequireTransforms> {
        None
    }

    fn as_data_source_renderer(&mut self) -> Option<&mut dyn DataSourceRenderer<T>> {
        None
    }

    /// Limits this component contributes to an axis besides its data.
    fn value_extents(&self) -> Option<ValueExtents> {
        None
    }

    /// Category cells this component needs besides its data.
    fn category_extents(&self) -> Option<CategoryExtents> {
        None
    }

    fn legend(&self) -> Option<Legend> {
        None
    }
}

/// Axis widening contributed by a non-data component such as a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueExtents {
    pub axis_name: String,
    pub minimum: f64,
    pub maximum: f64,
}

impl ValueExtents {
    #[must_use]
    pub fn new(axis_name: impl Into<String>, minimum: f64, maximum: f64) -> Self {
        Self {
            axis_name: axis_name.into(),
            minimum,
            maximum,
        }
    }
}

/// Category-axis twin of [`ValueExtents`]; NaN bounds are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExtents {
    pub axis_name: String,
    pub minimum: f64,
    pub maximum: f64,
}

impl CategoryExtents {
    #[must_use]
    pub fn new(axis_name: impl Into<String>, minimum: f64, maximum: f64) -> Self {
        Self {
            axis_name: axis_name.into(),
            minimum,
            maximum,
        }
    }
}

pub struct EnterLeaveContext<'a> {
    pub config: &'a ChartConfig,
    pub axes: &'a AxisSet,
    pub surface: &'a mut dyn VisualSurface,
    pub errors: &'a mut dyn ErrorReporter,
}

/// Attach/detach hooks, called when the component is added to or removed
/// from a chart.
pub trait RequireEnterLeave {
    fn enter(&mut self, ctx: &mut EnterLeaveContext<'_>);
    fn leave(&mut self, ctx: &mut EnterLeaveContext<'_>);
}

/// Space claims, made before render. Axis limits are not final yet, so
/// only axis configuration (side, name) should be read here.
pub trait RequireLayout {
    fn layout(
        &mut self,
        id: ComponentId,
        ctx: &mut LayoutContext,
        axes: &AxisSet,
    ) -> ChartResult<()>;
}

/// Ordering bucket inside the render phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderStage {
    Geometry,
    /// Runs after every data source and geometry component, once axis limits
    /// are final.
    Axes,
}

/// State shared by everything that renders during one pass.
pub struct RenderContext<'a> {
    pub dimensions: Size,
    /// Rectangle claimed by the current component (series area if none).
    pub area: Rect,
    pub series_area: Rect,
    pub axes: &'a mut AxisSet,
    pub surface: &'a mut dyn VisualSurface,
    pub errors: &'a mut dyn ErrorReporter,
}

pub trait RequireRender {
    fn render_stage(&self) -> RenderStage {
        RenderStage::Geometry
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>);
}

pub struct TransformContext<'a> {
    pub dimensions: Size,
    pub area: Rect,
    pub series_area: Rect,
    pub axes: &'a AxisSet,
    pub surface: &'a mut dyn VisualSurface,
}

/// Runs on every refresh, including pure resizes.
pub trait RequireTransforms {
    fn transforms(&mut self, ctx: &mut TransformContext<'_>);
}
