use crate::core::Point;
use crate::render::VisualHandle;

/// Book-keeping for one placed data point.
///
/// Pairs the owned visual with the axis-local coordinates it was placed at,
/// so the transforms phase can reposition it without touching the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemState {
    pub index: usize,
    pub category_value: f64,
    pub mapped_x: f64,
    pub mapped_y: f64,
    pub visual: VisualHandle,
}

impl ItemState {
    #[must_use]
    pub fn mapped(&self) -> Point {
        Point::new(self.mapped_x, self.mapped_y)
    }
}

/// Value and category limits observed by one series during its last pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesExtents {
    pub minimum: f64,
    pub maximum: f64,
    pub category_minimum: f64,
    pub category_maximum: f64,
}

impl Default for SeriesExtents {
    fn default() -> Self {
        Self {
            minimum: f64::NAN,
            maximum: f64::NAN,
            category_minimum: f64::NAN,
            category_maximum: f64::NAN,
        }
    }
}

impl SeriesExtents {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, category: f64, value: f64) {
        widen(&mut self.minimum, &mut self.maximum, value);
        widen(&mut self.category_minimum, &mut self.category_maximum, category);
    }

    pub fn update_category(&mut self, category: f64) {
        widen(&mut self.category_minimum, &mut self.category_maximum, category);
    }
}

fn widen(minimum: &mut f64, maximum: &mut f64, value: f64) {
    if value.is_nan() {
        return;
    }
    if minimum.is_nan() || value < *minimum {
        *minimum = value;
    }
    if maximum.is_nan() || value > *maximum {
        *maximum = value;
    }
}
