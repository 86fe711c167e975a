use shared::ParamError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A coordinate outside the grid. Never produced by a correct tick.
    #[error("cell ({x}, {y}) is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),

    /// Sampling from a direction set with nothing left in it
    #[error("no directions left to sample")]
    EmptyDistribution,
}
