pub mod axis;
pub mod layout;
pub mod primitives;
pub mod recycler;
pub mod ticks;
pub mod transform;
pub mod types;

pub use axis::{Axis, AxisId, AxisOrientation, AxisSet, AxisType, Side};
pub use layout::{LayoutContext, LayoutOutcome};
pub use primitives::DataValue;
pub use recycler::{Recycled, Recycler};
pub use ticks::{DEFAULT_MAX_TICKS, TickCalculator, TickSet};
pub use transform::Matrix;
pub use types::{ComponentId, Point, Rect, Size};
