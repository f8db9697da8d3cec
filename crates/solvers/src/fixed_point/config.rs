use thiserror::Error;

/// Configuration for the fixed-point solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    tolerance: f64,
    patience: usize,
}

/// Errors that can occur when validating a fixed-point solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tolerance must be finite and non-negative")]
    Tolerance,

    #[error("patience must be at least one step")]
    Patience,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tolerance: 1e-6,
            patience: Self::DEFAULT_PATIENCE,
        }
    }
}

impl Config {
    /// Non-improving steps tolerated before the solver gives up.
    pub const DEFAULT_PATIENCE: usize = 10;

    /// Creates a new config with a validated tolerance and patience.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance is negative or non-finite, or if
    /// `patience` is zero.
    pub fn new(max_iters: usize, tolerance: f64, patience: usize) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }
        if patience == 0 {
            return Err(ConfigError::Patience);
        }

        Ok(Self {
            max_iters,
            tolerance,
            patience,
        })
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the convergence tolerance, applied to both the step size and
    /// the residual `|f(x)|`.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns how many non-improving steps are tolerated.
    #[must_use]
    pub fn patience(&self) -> usize {
        self.patience
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_tolerance() {
        assert_eq!(Config::new(10, -1.0, 10), Err(ConfigError::Tolerance));
        assert_eq!(Config::new(10, f64::NAN, 10), Err(ConfigError::Tolerance));
        assert_eq!(Config::new(10, f64::INFINITY, 10), Err(ConfigError::Tolerance));
    }

    #[test]
    fn rejects_zero_patience() {
        assert_eq!(Config::new(10, 1e-6, 0), Err(ConfigError::Patience));
    }

    #[test]
    fn zero_tolerance_is_allowed() {
        let config = Config::new(0, 0.0, 1).expect("valid config");
        assert_eq!(config.max_iters(), 0);
        assert_eq!(config.patience(), 1);
    }
}
