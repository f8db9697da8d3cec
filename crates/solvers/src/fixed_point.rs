//! Fixed-point iteration for single-variable root finding.
//!
//! # Algorithm
//!
//! To find a root of `f`, the caller supplies an iteration map `g` whose fixed
//! points (`x = g(x)`) are roots of `f`. Starting from `x0`, the solver
//! repeats `x_{n+1} = g(x_n)` and stops when either the step
//! `|x_{n+1} - x_n|` or the residual `|f(x_{n+1})|` falls below the tolerance.
//!
//! # Stopping Rules
//!
//! - **Converged**: step or residual below tolerance.
//! - **Patience**: every step that fails to improve on the smallest step so
//!   far uses up one unit of patience; when it runs out the solver reports the
//!   current iterate with the best step as its error.
//! - **Max iterations**: the last iterate is reported with the best step.
//!
//! Non-finite values end the solve with an [`Error`]: a non-finite `x0`, an
//! iterate that overflows or leaves the domain of `g`, or a NaN residual.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] for `x0` and one per accepted iterate,
//! before the convergence checks. Observers can return [`Action::StopEarly`]
//! to halt at the current iterate. Use [`History`] to keep the full record.

mod action;
mod config;
mod error;
mod event;
mod history;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use history::History;
pub use solution::{Solution, Status};

use fixpoint_core::{Model, Observer};

/// Finds a fixed point of `g`, checking convergence against the residual `f`.
///
/// # Errors
///
/// Returns an error if `x0` is not finite, if an iterate or residual becomes
/// NaN (or an iterate infinite), or if either model fails.
pub fn solve<F, G, Obs>(
    f: &F,
    g: &G,
    x0: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    F: Model<Input = f64, Output = f64>,
    G: Model<Input = f64, Output = f64>,
    Obs: Observer<Event, Action>,
{
    if !x0.is_finite() {
        return Err(Error::NonFiniteInitial { x0 });
    }

    let mut x_now = x0;
    let mut fx_now = eval(f, x_now, 0)?;

    let initial = Event {
        iter: 0,
        x: x_now,
        fx: fx_now,
        step: None,
    };
    let stop = observer.observe(&initial);

    let mut best_error = f64::INFINITY;
    if let Some(Action::StopEarly) = stop {
        return Ok(Solution {
            status: Status::StoppedByObserver,
            x: x_now,
            fx: fx_now,
            error: best_error,
            iters: 0,
        });
    }

    let mut patience = config.patience();

    for iter in 1..=config.max_iters() {
        let x_next = eval(g, x_now, iter)?;
        if !x_next.is_finite() {
            return Err(Error::NonFiniteIterate {
                iter,
                previous: x_now,
                problematic: x_next,
            });
        }

        let fx = eval(f, x_next, iter)?;
        let step = (x_next - x_now).abs();

        if step < best_error {
            best_error = step;
        } else {
            patience = patience.saturating_sub(1);
        }

        if fx.is_nan() {
            return Err(Error::NanResidual { iter, x: x_next });
        }

        let event = Event {
            iter,
            x: x_next,
            fx,
            step: Some(step),
        };

        let solution = |status, error| Solution {
            status,
            x: x_next,
            fx,
            error,
            iters: iter,
        };

        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(solution(Status::StoppedByObserver, step));
        }

        if step < config.tolerance() || fx.abs() < config.tolerance() {
            return Ok(solution(Status::Converged, step));
        }

        if patience == 0 {
            return Ok(solution(Status::PatienceExhausted, best_error));
        }

        x_now = x_next;
        fx_now = fx;
    }

    Ok(Solution {
        status: Status::MaxIters,
        x: x_now,
        fx: fx_now,
        error: best_error,
        iters: config.max_iters(),
    })
}

fn eval<M>(model: &M, x: f64, iter: usize) -> Result<f64, Error>
where
    M: Model<Input = f64, Output = f64>,
{
    model.call(&x).map_err(|source| Error::Model {
        iter,
        source: Box::new(source),
    })
}

/// Runs fixed-point iteration without observation.
///
/// # Errors
///
/// See [`solve`].
pub fn solve_unobserved<F, G>(f: &F, g: &G, x0: f64, config: &Config) -> Result<Solution, Error>
where
    F: Model<Input = f64, Output = f64>,
    G: Model<Input = f64, Output = f64>,
{
    solve(f, g, x0, config, ())
}
