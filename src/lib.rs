//! chartloom: declarative chart-rendering core.
//!
//! Named axes, data sources and components are registered on a [`Chart`];
//! every refresh runs layout, a coordinated render over each data source when
//! something changed, and a transforms pass that rescales the already-built
//! geometry to the current layout. Pixels are left to the host through the
//! [`render::VisualSurface`] contract.

pub mod api;
pub mod core;
pub mod decorations;
pub mod error;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{Chart, ChartConfig};
pub use error::{ChartError, ChartResult};
