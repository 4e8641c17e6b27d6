mod accessor;
mod axis_binding;
mod chart;
mod chart_config;
mod component;
mod data_source;
mod diagnostics;
mod legend;
mod refresh;

pub use accessor::ValueAccessor;
pub use axis_binding::{AxisBinding, AxisRole};
pub use chart::{Chart, CycleReport};
pub use chart_config::{AxisStyle, ChartConfig, LabelStyle};
pub use component::{
    CategoryExtents, ChartComponent, EnterLeaveContext, RenderContext, RenderStage, RequireEnterLeave,
    RequireLayout, RequireRender, RequireTransforms, TransformContext, ValueExtents,
};
pub use data_source::{
    DataSource, DataSourceRenderer, DataSourceState, RenderCompleteHook, RenderPass,
};
pub use diagnostics::{ChartValidationResult, Diagnostics, ErrorReporter};
pub use legend::Legend;
pub use refresh::{RefreshRequest, RefreshSignal, SubscriptionId};
