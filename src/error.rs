use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Objective count, creation type or run parameters are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A reference point does not match the objective space dimension.
    #[error("invalid argument: expected a point with {expected} coordinates, got {got}")]
    InvalidArgument {
        expected: usize,
        got: usize,
    },

    /// A candidate objective vector does not match the reference vector length.
    #[error("dimension mismatch: expected {expected} objectives but candidate {index} has {got}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        index: usize,
    },

    #[error("selection invoked on an empty population")]
    EmptyPopulation,

    #[error("failed to parse parameters: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn check_point(expected: usize, point: &[f64]) -> Result<()> {
        if point.len() != expected {
            return Err(Error::InvalidArgument {
                expected,
                got: point.len(),
            });
        }

        Ok(())
    }
}
