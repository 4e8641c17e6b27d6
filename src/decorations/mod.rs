mod background;
mod category_axis;
mod horizontal_rule;
mod value_axis;

pub use background::Background;
pub use category_axis::CategoryAxisDecoration;
pub use horizontal_rule::HorizontalRule;
pub use value_axis::ValueAxisDecoration;

use crate::core::Recycled;
use crate::render::{LayerId, VisualHandle, VisualSurface};

/// Axis label paired with the axis value it sits at.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabel {
    pub value: f64,
    pub visual: VisualHandle,
    pub text: String,
}

fn commit_tick_labels(
    surface: &mut dyn VisualSurface,
    layer: LayerId,
    recycled: Recycled<VisualHandle>,
) {
    for visual in recycled.unused {
        surface.remove(layer, visual);
    }
    for visual in recycled.created {
        surface.add(layer, visual);
    }
}
