use thiserror::Error;

/// Errors that end a fixed-point solve before a result is available.
///
/// Display strings are user-facing: the HTTP service returns them verbatim.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid initial value: NaN or Infinity detected")]
    NonFiniteInitial { x0: f64 },

    #[error("Computation resulted in NaN or Infinity")]
    NonFiniteIterate {
        iter: usize,
        previous: f64,
        problematic: f64,
    },

    #[error("Function evaluation resulted in NaN")]
    NanResidual { iter: usize, x: f64 },

    #[error("Computational error: {source}")]
    Model {
        iter: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Returns the iteration at which the error occurred.
    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::NonFiniteInitial { .. } => 0,
            Self::NonFiniteIterate { iter, .. }
            | Self::NanResidual { iter, .. }
            | Self::Model { iter, .. } => *iter,
        }
    }
}
