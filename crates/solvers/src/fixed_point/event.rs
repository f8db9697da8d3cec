/// An iterate reported by the fixed-point solver.
///
/// The solver emits one event for the initial guess (`iter == 0`, no step)
/// and one for every accepted iterate after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Iteration counter, zero for the initial guess.
    pub iter: usize,

    /// The iterate `x_n`.
    pub x: f64,

    /// The residual `f(x_n)`.
    pub fx: f64,

    /// The step `|x_n - x_{n-1}|`, absent for the initial guess.
    pub step: Option<f64>,
}
