use thiserror::Error;

use crate::core::{ComponentId, Side};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("layout is finalized; claim from {component} rejected")]
    LayoutFinalized { component: ComponentId },

    #[error(
        "claim of {amount} on {side:?} by {component} exceeds remaining space {available}"
    )]
    InsufficientSpace {
        component: ComponentId,
        side: Side,
        amount: f64,
        available: f64,
    },

    #[error("{component} already claimed space in this layout pass")]
    DuplicateClaim { component: ComponentId },

    #[error("name `{0}` is already registered")]
    DuplicateName(String),

    #[error("unknown component {0}")]
    UnknownComponent(ComponentId),
}
