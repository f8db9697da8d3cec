use std::fmt;

use crate::{
    request::InputError,
    response::{Failure, Report, format_optional},
};

/// Text shown when the service cannot be reached or answers with something
/// that is not JSON.
pub const FETCH_FAILED: &str = "Failed to fetch results. Check the API server.";

/// Heading shown above a successful result.
pub const CONVERGED_HEADING: &str = "Convergence achieved!";

/// What the result region currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultView {
    /// Nothing has been submitted yet.
    #[default]
    Empty,
    Converged {
        x: Option<f64>,
        fx: Option<f64>,
        n: u64,
        error: Option<f64>,
    },
    Failed {
        message: String,
        iteration: u64,
    },
    Unreachable,
    Invalid(InputError),
}

impl ResultView {
    /// The region's text, one entry per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::Converged { x, fx, n, error } => vec![
                CONVERGED_HEADING.to_string(),
                format!("x = {}", format_optional(*x)),
                format!("f(x) = {}", format_optional(*fx)),
                format!("Iterations: {n}"),
                format!("Error: {}", format_optional(*error)),
            ],
            Self::Failed { message, iteration } => vec![
                format!("Error: {message}"),
                format!("Iterations: {iteration}"),
            ],
            Self::Unreachable => vec![FETCH_FAILED.to_string()],
            Self::Invalid(err) => vec![format!("Invalid input: {err}")],
        }
    }

    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

impl From<&Report> for ResultView {
    fn from(report: &Report) -> Self {
        Self::Converged {
            x: report.x,
            fx: report.fx,
            n: report.n,
            error: report.error,
        }
    }
}

impl From<Failure> for ResultView {
    fn from(failure: Failure) -> Self {
        Self::Failed {
            message: failure.message,
            iteration: failure.iteration,
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
