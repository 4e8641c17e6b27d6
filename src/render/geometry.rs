use serde::{Deserialize, Serialize};

use crate::core::{Matrix, Point, Rect};
use crate::error::{ChartError, ChartResult};

/// Open or closed polyline: a start point followed by line segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathFigure {
    pub start: Point,
    pub segments: Vec<Point>,
    pub closed: bool,
}

impl PathFigure {
    #[must_use]
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Closed four-corner figure spanning `(x1, y1)` to `(x2, y2)`.
    #[must_use]
    pub fn rectangle(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            start: Point::new(x1, y1),
            segments: vec![Point::new(x2, y1), Point::new(x2, y2), Point::new(x1, y2)],
            closed: true,
        }
    }

    /// Two-point open figure from `start` to `end`.
    #[must_use]
    pub fn line(start: Point, end: Point) -> Self {
        Self {
            start,
            segments: vec![end],
            closed: false,
        }
    }

    pub fn line_to(&mut self, point: Point) {
        self.segments.push(point);
    }

    #[must_use]
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().copied())
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        1 + self.segments.len()
    }

    #[must_use]
    pub fn transformed(&self, matrix: &Matrix) -> Self {
        Self {
            start: matrix.transform_point(self.start),
            segments: self
                .segments
                .iter()
                .map(|point| matrix.transform_point(*point))
                .collect(),
            closed: self.closed,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points().any(|point| !point.x.is_finite() || !point.y.is_finite()) {
            return Err(ChartError::InvalidData(
                "path figure points must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Geometry attached to a visual, expressed in the component's local units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Path(Vec<PathFigure>),
    Line { start: Point, end: Point },
    Rect(Rect),
}

impl Geometry {
    #[must_use]
    pub fn transformed(&self, matrix: &Matrix) -> Self {
        match self {
            Self::Path(figures) => Self::Path(
                figures
                    .iter()
                    .map(|figure| figure.transformed(matrix))
                    .collect(),
            ),
            Self::Line { start, end } => Self::Line {
                start: matrix.transform_point(*start),
                end: matrix.transform_point(*end),
            },
            Self::Rect(rect) => {
                let a = matrix.transform_point(Point::new(rect.left, rect.top));
                let b = matrix.transform_point(Point::new(rect.right(), rect.bottom()));
                Self::Rect(Rect::new(
                    a.x.min(b.x),
                    a.y.min(b.y),
                    (b.x - a.x).abs(),
                    (b.y - a.y).abs(),
                ))
            }
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Path(figures) => figures.iter().try_for_each(PathFigure::validate),
            Self::Line { start, end } => {
                if [start.x, start.y, end.x, end.y]
                    .iter()
                    .all(|value| value.is_finite())
                {
                    Ok(())
                } else {
                    Err(ChartError::InvalidData(
                        "line coordinates must be finite".to_owned(),
                    ))
                }
            }
            Self::Rect(rect) => {
                if [rect.left, rect.top, rect.width, rect.height]
                    .iter()
                    .all(|value| value.is_finite())
                {
                    Ok(())
                } else {
                    Err(ChartError::InvalidData(
                        "rect coordinates must be finite".to_owned(),
                    ))
                }
            }
        }
    }
}
