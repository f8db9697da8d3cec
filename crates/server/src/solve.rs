use fixpoint_expr::{Expr, Transform};
use fixpoint_solvers::fixed_point::{self, Error, Event, History, Solution, Status};
use serde::Deserialize;
use warp::http::StatusCode;

use crate::{
    ServerConfig,
    reply::{ErrorReply, Iterate, SolveReply},
};

/// The request body accepted by `POST /fixed-point-iteration`.
///
/// All four keys are required and no others are allowed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolveParams {
    pub function: String,
    pub x0: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// Largest `max_iterations` a request may ask for.
///
/// Every iterate is kept for the reply's table, so this bounds both the work
/// and the size of one reply.
pub const MAX_ITERATIONS: usize = 100_000;

/// Settings that shape every solve the service performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverSettings {
    pub transform: Transform,
    pub patience: usize,
}

impl From<&ServerConfig> for SolverSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            transform: config.transform,
            patience: config.patience,
        }
    }
}

/// The outcome of one request, ready to be written as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Solved(SolveReply),
    Rejected(StatusCode, ErrorReply),
}

/// Decodes a raw request body and runs the solver on it.
#[must_use]
pub fn handle(body: &[u8], settings: SolverSettings) -> Outcome {
    match serde_json::from_slice::<SolveParams>(body) {
        Ok(params) => run(&params, settings),
        Err(_) => Outcome::Rejected(StatusCode::BAD_REQUEST, ErrorReply::schema()),
    }
}

/// Runs the solver for already-decoded parameters.
#[must_use]
pub fn run(params: &SolveParams, settings: SolverSettings) -> Outcome {
    let invalid_input = |message: String| {
        Outcome::Rejected(
            StatusCode::BAD_REQUEST,
            ErrorReply {
                error: ErrorReply::INVALID_INPUT,
                message,
            },
        )
    };
    let computation_failed = |message: String| {
        Outcome::Rejected(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorReply {
                error: ErrorReply::COMPUTATION_FAILED,
                message,
            },
        )
    };

    if params.max_iterations > MAX_ITERATIONS {
        return invalid_input(format!("max_iterations must be at most {MAX_ITERATIONS}"));
    }

    let f: Expr = match params.function.parse() {
        Ok(f) => f,
        Err(err) => return computation_failed(format!("invalid function: {err}")),
    };
    let g = match settings.transform.apply(&f) {
        Ok(g) => g,
        Err(err) => return computation_failed(err.to_string()),
    };

    let config = match fixed_point::Config::new(
        params.max_iterations,
        params.tolerance,
        settings.patience,
    ) {
        Ok(config) => config,
        Err(err) => return invalid_input(err.to_string()),
    };

    let mut history = History::new();
    let result = fixed_point::solve(&f, &g, params.x0, &config, &mut history);
    let iterations = table(history.events(), &g);

    Outcome::Solved(match result {
        Ok(solution) => solved(&solution, iterations),
        Err(err) => failed(&err, iterations),
    })
}

fn table(events: &[Event], g: &Expr) -> Vec<Iterate> {
    events
        .iter()
        .map(|event| Iterate {
            n: event.iter,
            x_n: event.x,
            fx_n: event.fx,
            error: event.step,
            g_x_function: (event.iter == 0).then(|| g.to_string()),
        })
        .collect()
}

fn solved(solution: &Solution, iterations: Vec<Iterate>) -> SolveReply {
    SolveReply {
        success: solution.status.is_success(),
        message: solution.status.message().to_string(),
        n: Some(solution.iters),
        x: Some(solution.x),
        fx: Some(solution.fx),
        error: Some(solution.error),
        iteration: (solution.status == Status::MaxIters).then_some(solution.iters),
        iterations,
        ..SolveReply::default()
    }
}

fn failed(err: &Error, iterations: Vec<Iterate>) -> SolveReply {
    let reply = SolveReply {
        success: false,
        message: err.to_string(),
        iteration: Some(err.iter()),
        iterations,
        ..SolveReply::default()
    };

    match err {
        Error::NonFiniteInitial { x0 } => SolveReply {
            x_0: Some(*x0),
            iteration: None,
            ..reply
        },
        Error::NonFiniteIterate {
            previous,
            problematic,
            ..
        } => SolveReply {
            previous_x: Some(*previous),
            problematic_x: Some(*problematic),
            ..reply
        },
        Error::NanResidual { x, .. } => SolveReply {
            x_n: Some(*x),
            fx_n: Some(f64::NAN),
            ..reply
        },
        Error::Model { .. } => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const SETTINGS: SolverSettings = SolverSettings {
        transform: Transform::Relaxation,
        patience: 10,
    };

    fn params(function: &str, x0: f64) -> SolveParams {
        SolveParams {
            function: function.to_string(),
            x0,
            tolerance: 1e-8,
            max_iterations: 100,
        }
    }

    fn solved_reply(outcome: Outcome) -> SolveReply {
        match outcome {
            Outcome::Solved(reply) => reply,
            Outcome::Rejected(status, reply) => panic!("rejected with {status}: {reply:?}"),
        }
    }

    #[test]
    fn solves_with_relaxation() {
        // g(x) = x - (x^2 - 2)/4 contracts around sqrt(2).
        let reply = solved_reply(run(&params("(x^2 - 2)/4", 1.0), SETTINGS));

        assert!(reply.success);
        assert_eq!(reply.message, "Convergence achieved");
        assert_relative_eq!(reply.x.expect("x is set"), 2.0_f64.sqrt(), epsilon = 1e-7);
        assert_eq!(reply.iterations.len(), reply.n.expect("n is set") + 1);
        assert_eq!(
            reply.iterations[0].g_x_function.as_deref(),
            Some("x - (x^2 - 2)/4")
        );
        assert!(reply.iterations[1].g_x_function.is_none());
        assert_eq!(reply.iteration, None);
    }

    #[test]
    fn solves_with_isolation() {
        let settings = SolverSettings {
            transform: Transform::Isolate,
            ..SETTINGS
        };
        // x^3 = x + 1  =>  g(x) = (x + 1)^(1/3), converging to the plastic number.
        let reply = solved_reply(run(&params("x^3 - x - 1", 1.0), settings));

        assert!(reply.success);
        assert_relative_eq!(reply.x.expect("x is set"), 1.324_717_957, epsilon = 1e-6);
    }

    #[test]
    fn max_iterations_is_a_failure_with_count() {
        let mut p = params("-1", 0.0);
        p.max_iterations = 5;
        let settings = SolverSettings {
            patience: 100,
            ..SETTINGS
        };

        let reply = solved_reply(run(&p, settings));

        assert!(!reply.success);
        assert_eq!(reply.message, "Maximum iterations reached without convergence");
        assert_eq!(reply.iteration, Some(5));
        assert_eq!(reply.n, Some(5));
        assert_relative_eq!(reply.x.expect("x is set"), 5.0);
    }

    #[test]
    fn reports_non_finite_iterates() {
        // g(x) = 1/(x - 2) blows up once an iterate lands on 2.
        let reply = solved_reply(run(&params("x - 1/(x - 2)", 2.5), SETTINGS));

        assert!(!reply.success);
        assert_eq!(reply.message, "Computation resulted in NaN or Infinity");
        assert_eq!(reply.iteration, Some(2));
        assert_relative_eq!(reply.previous_x.expect("previous is set"), 2.0);
        assert_eq!(reply.iterations.len(), 2);
    }

    #[test]
    fn reports_non_finite_initial_value() {
        let reply = solved_reply(run(&params("x", f64::NAN), SETTINGS));

        assert!(!reply.success);
        assert_eq!(reply.message, "Invalid initial value: NaN or Infinity detected");
        assert_eq!(reply.iteration, None);
        assert!(reply.iterations.is_empty());
    }

    #[test]
    fn bad_function_is_a_computation_failure() {
        let outcome = run(&params("x +* 2", 1.0), SETTINGS);

        let Outcome::Rejected(status, reply) = outcome else {
            panic!("expected a rejection");
        };
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.error, "Computation failed");
        assert!(reply.message.starts_with("invalid function"));
    }

    #[test]
    fn negative_tolerance_is_invalid_input() {
        let mut p = params("x", 1.0);
        p.tolerance = -1.0;

        let Outcome::Rejected(status, reply) = run(&p, SETTINGS) else {
            panic!("expected a rejection");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.error, "Invalid input");
    }

    #[test]
    fn max_iterations_is_capped() {
        let mut p = params("-1/x", 1.0);
        p.tolerance = 0.0;
        p.max_iterations = MAX_ITERATIONS + 1;

        let Outcome::Rejected(status, reply) = run(&p, SETTINGS) else {
            panic!("expected a rejection");
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.error, "Invalid input");
        assert_eq!(reply.message, "max_iterations must be at most 100000");

        p.max_iterations = 1_000;
        assert!(matches!(run(&p, SETTINGS), Outcome::Solved(_)));
    }

    #[test]
    fn deeply_nested_function_is_a_computation_failure() {
        let depth = 31_000;
        let mut p = params("", 1.0);
        p.function = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));

        let Outcome::Rejected(status, reply) = run(&p, SETTINGS) else {
            panic!("expected a rejection");
        };
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(reply.message.contains("nested too deeply"), "got {}", reply.message);
    }

    #[test]
    fn schema_rejects_extra_and_missing_keys() {
        let bodies: [&[u8]; 5] = [
            br#"{"function":"x","x0":1,"tolerance":0.1}"#,
            br#"{"function":"x","x0":1,"tolerance":0.1,"max_iterations":5,"extra":1}"#,
            br#"{"function":"x","x0":"1","tolerance":0.1,"max_iterations":5}"#,
            br#"{"function":"x","x0":null,"tolerance":0.1,"max_iterations":5}"#,
            b"not json",
        ];

        for body in bodies {
            assert_eq!(
                handle(body, SETTINGS),
                Outcome::Rejected(StatusCode::BAD_REQUEST, ErrorReply::schema())
            );
        }
    }

    #[test]
    fn accepts_integer_numbers() {
        let body = br#"{"function":"x - 3","x0":0,"tolerance":1,"max_iterations":50}"#;
        assert!(matches!(handle(body, SETTINGS), Outcome::Solved(_)));
    }
}
