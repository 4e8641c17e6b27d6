use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use crate::core::axis::Side;
use crate::core::types::{ComponentId, Rect, Size};
use crate::error::{ChartError, ChartResult};

const CLAIM_TOLERANCE: f64 = 1e-9;

/// Space allocator for one layout pass.
///
/// Components claim strips from the sides of the remaining rectangle in
/// declaration order; whatever is left when the pass is finalized becomes the
/// series area.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    dimensions: Size,
    remaining: Rect,
    claims: IndexMap<ComponentId, Rect>,
    finalized: bool,
}

impl LayoutContext {
    pub fn new(dimensions: Size) -> ChartResult<Self> {
        let dimensions = dimensions.validate()?;
        Ok(Self {
            dimensions,
            remaining: Rect::from_size(dimensions),
            claims: IndexMap::new(),
            finalized: false,
        })
    }

    #[must_use]
    pub fn dimensions(&self) -> Size {
        self.dimensions
    }

    #[must_use]
    pub fn remaining_rect(&self) -> Rect {
        self.remaining
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    #[must_use]
    pub fn claim_for(&self, component: ComponentId) -> Option<Rect> {
        self.claims.get(&component).copied()
    }

    pub fn claim_space(
        &mut self,
        component: ComponentId,
        side: Side,
        amount: f64,
    ) -> ChartResult<Rect> {
        if self.finalized {
            return Err(ChartError::LayoutFinalized { component });
        }
        if side == Side::Float {
            return Ok(self.remaining);
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "claim amount from {component} must be finite and non-negative"
            )));
        }
        if self.claims.contains_key(&component) {
            return Err(ChartError::DuplicateClaim { component });
        }

        let available = match side {
            Side::Top | Side::Bottom => self.remaining.height,
            Side::Left | Side::Right | Side::Float => self.remaining.width,
        };
        if amount > available + CLAIM_TOLERANCE {
            return Err(ChartError::InsufficientSpace {
                component,
                side,
                amount,
                available,
            });
        }
        let amount = amount.min(available);

        let remaining = self.remaining;
        let claimed = match side {
            Side::Top => {
                self.remaining.top += amount;
                self.remaining.height -= amount;
                Rect::new(remaining.left, remaining.top, remaining.width, amount)
            }
            Side::Bottom => {
                self.remaining.height -= amount;
                Rect::new(
                    remaining.left,
                    remaining.bottom() - amount,
                    remaining.width,
                    amount,
                )
            }
            Side::Left => {
                self.remaining.left += amount;
                self.remaining.width -= amount;
                Rect::new(remaining.left, remaining.top, amount, remaining.height)
            }
            Side::Right => {
                self.remaining.width -= amount;
                Rect::new(
                    remaining.right() - amount,
                    remaining.top,
                    amount,
                    remaining.height,
                )
            }
            Side::Float => remaining,
        };

        trace!(
            component = component.raw(),
            side = ?side,
            amount,
            "layout claim"
        );
        self.claims.insert(component, claimed);
        Ok(claimed)
    }

    /// Freezes the pass; later claims fail with [`ChartError::LayoutFinalized`].
    pub fn finalize(&mut self) -> LayoutOutcome {
        self.finalized = true;
        LayoutOutcome {
            dimensions: self.dimensions,
            series_area: self.remaining,
            claims: self.claims.clone(),
        }
    }
}

/// Frozen result of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOutcome {
    pub dimensions: Size,
    pub series_area: Rect,
    pub claims: IndexMap<ComponentId, Rect>,
}

impl LayoutOutcome {
    /// Claimed rectangle of `component`, or the series area when it made no
    /// claim.
    #[must_use]
    pub fn area_for(&self, component: ComponentId) -> Rect {
        self.claims
            .get(&component)
            .copied()
            .unwrap_or(self.series_area)
    }
}
