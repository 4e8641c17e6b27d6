use serde::{Deserialize, Serialize};

use crate::core::axis::{Axis, Side};
use crate::core::types::{Point, Rect};

/// 2D affine matrix in row-vector convention:
/// `x' = x * m11 + y * m21 + offset_x`, `y' = x * m12 + y * m22 + offset_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(m11: f64, m12: f64, m21: f64, m22: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            offset_x,
            offset_y,
        }
    }

    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[must_use]
    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    #[must_use]
    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            point.x * self.m11 + point.y * self.m21 + self.offset_x,
            point.x * self.m12 + point.y * self.m22 + self.offset_y,
        )
    }

    /// Applies `self` first, then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self::new(
            self.m11 * next.m11 + self.m12 * next.m21,
            self.m11 * next.m12 + self.m12 * next.m22,
            self.m21 * next.m11 + self.m22 * next.m21,
            self.m21 * next.m12 + self.m22 * next.m22,
            self.offset_x * next.m11 + self.offset_y * next.m21 + next.offset_x,
            self.offset_x * next.m12 + self.offset_y * next.m22 + next.offset_y,
        )
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [
            self.m11,
            self.m12,
            self.m21,
            self.m22,
            self.offset_x,
            self.offset_y,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

fn usable_range(axis: &Axis) -> Option<f64> {
    let range = axis.range();
    (range.is_finite() && range > 0.0).then_some(range)
}

/// Category units along x, value units along y (flipped), into `area`.
#[must_use]
pub fn cartesian_transform(area: Rect, category_axis: &Axis, value_axis: &Axis) -> Option<Matrix> {
    let category_range = usable_range(category_axis)?;
    let value_range = usable_range(value_axis)?;
    let sx = area.width / category_range;
    let sy = area.height / value_range;
    let matrix = Matrix::scale(sx, -sy).then(&Matrix::translation(
        area.left - category_axis.minimum() * sx,
        area.top + value_axis.maximum() * sy,
    ));
    matrix.is_finite().then_some(matrix)
}

/// Unit square into `area`.
#[must_use]
pub fn normalized_transform(area: Rect) -> Matrix {
    Matrix::new(area.width, 0.0, 0.0, area.height, area.left, area.top)
}

/// Normalized x across `area`, value units along y.
#[must_use]
pub fn horizontal_band_transform(area: Rect, value_axis: &Axis) -> Option<Matrix> {
    let value_range = usable_range(value_axis)?;
    let sy = area.height / value_range;
    let matrix = Matrix::new(
        area.width,
        0.0,
        0.0,
        -sy,
        area.left,
        area.top + value_axis.maximum() * sy,
    );
    matrix.is_finite().then_some(matrix)
}

/// Pixels along x, value units along y; shifted by `margin` toward `side`.
#[must_use]
pub fn value_axis_bar_transform(
    area: Rect,
    value_axis: &Axis,
    margin: f64,
    side: Side,
) -> Option<Matrix> {
    let value_range = usable_range(value_axis)?;
    let sy = area.height / value_range;
    let offset = if side == Side::Right { margin } else { -margin };
    let matrix = Matrix::new(
        1.0,
        0.0,
        0.0,
        -sy,
        area.left + offset,
        area.top + value_axis.maximum() * sy,
    );
    matrix.is_finite().then_some(matrix)
}

/// Category units along x, pixels along y; shifted by `margin` toward `side`.
#[must_use]
pub fn category_axis_bar_transform(
    area: Rect,
    category_axis: &Axis,
    margin: f64,
    side: Side,
) -> Option<Matrix> {
    let category_range = usable_range(category_axis)?;
    let sx = area.width / category_range;
    let offset = if side == Side::Top { -margin } else { margin };
    let matrix = Matrix::new(
        sx,
        0.0,
        0.0,
        1.0,
        area.left - category_axis.minimum() * sx,
        area.top + offset,
    );
    matrix.is_finite().then_some(matrix)
}
