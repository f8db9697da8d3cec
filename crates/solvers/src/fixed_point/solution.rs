/// How a fixed-point solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The step or the residual fell below the tolerance.
    Converged,

    /// Too many steps failed to improve on the best step size.
    PatienceExhausted,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

impl Status {
    /// Returns true if the result should be reported as a success.
    ///
    /// Running out of patience still counts: the best step is reported.
    #[must_use]
    pub fn is_success(self) -> bool {
        !matches!(self, Self::MaxIters)
    }

    /// A short user-facing description of the outcome.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Converged => "Convergence achieved",
            Self::PatienceExhausted => "Patience limit reached",
            Self::MaxIters => "Maximum iterations reached without convergence",
            Self::StoppedByObserver => "Stopped early",
        }
    }
}

/// The result of a fixed-point solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// The reported iterate.
    pub x: f64,

    /// Residual `f(x)` at the reported iterate.
    pub fx: f64,

    /// Step size at convergence, or the best step seen otherwise.
    pub error: f64,

    /// Iteration count when the solver finished.
    pub iters: usize,
}
