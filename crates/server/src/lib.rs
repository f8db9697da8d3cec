//! HTTP service for fixed-point iteration.
//!
//! The service exposes a single endpoint:
//!
//! - `POST /fixed-point-iteration`: accepts
//!   `{"function", "x0", "tolerance", "max_iterations"}` and replies with the
//!   solver outcome, including the per-iteration table
//!
//! Replies use three shapes:
//!
//! - `200` with `success: true` and `x`, `f(x)`, `n`, `error`, `iterations`
//! - `200` with `success: false`, a `message`, and the iteration it stopped at
//! - `400`/`500` with `error` and `message` for bad input or a function that
//!   cannot be parsed or rearranged
//!
//! Requests asking for more than [`MAX_ITERATIONS`] iterations are rejected
//! as invalid input. Solves run on tokio's blocking pool.
//!
//! Browser callers are allowed from any origin.
//!
//! # Example
//! ```no_run
//! use fixpoint_server::{ServerConfig, run};
//!
//! #[tokio::main]
//! async fn main() {
//!     run(ServerConfig::default()).await;
//! }
//! ```

mod config;
mod reply;
mod solve;

pub use config::{ConfigError, ServerConfig};
pub use reply::{ErrorReply, Iterate, SolveReply};
pub use solve::{MAX_ITERATIONS, Outcome, SolveParams, SolverSettings, handle, run as solve};

use warp::{Filter, Rejection, Reply, http::StatusCode, hyper::body::Bytes};

/// Path of the solve endpoint.
pub const SOLVE_PATH: &str = "fixed-point-iteration";

/// Largest request body accepted, in bytes.
const BODY_LIMIT: u64 = 64 * 1024;

/// Builds the service's routes.
pub fn routes(
    settings: SolverSettings,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["POST", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    warp::path(SOLVE_PATH)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::bytes())
        .and_then(move |body: Bytes| async move {
            let reply = tokio::task::spawn_blocking(move || respond(handle(&body, settings)))
                .await
                .unwrap_or_else(|err| {
                    eprintln!("solve task failed: {err}");
                    respond(Outcome::Rejected(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorReply {
                            error: ErrorReply::COMPUTATION_FAILED,
                            message: err.to_string(),
                        },
                    ))
                });
            Ok::<_, Rejection>(reply)
        })
        .with(cors)
}

fn respond(outcome: Outcome) -> warp::reply::WithStatus<warp::reply::Json> {
    match outcome {
        Outcome::Solved(reply) => {
            if !reply.success {
                eprintln!("solve failed: {}", reply.message);
            }
            warp::reply::with_status(warp::reply::json(&reply), StatusCode::OK)
        }
        Outcome::Rejected(status, reply) => {
            eprintln!("request rejected ({status}): {}", reply.message);
            warp::reply::with_status(warp::reply::json(&reply), status)
        }
    }
}

/// Runs the service until the process is stopped.
pub async fn run(config: ServerConfig) {
    let settings = SolverSettings::from(&config);
    let addr = config.addr();

    println!("Server running on http://{addr}/{SOLVE_PATH}");
    warp::serve(routes(settings)).run(addr).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    use fixpoint_expr::Transform;
    use serde_json::Value;

    const SETTINGS: SolverSettings = SolverSettings {
        transform: Transform::Relaxation,
        patience: 10,
    };

    async fn post(body: &str) -> (StatusCode, Value) {
        let response = warp::test::request()
            .method("POST")
            .path("/fixed-point-iteration")
            .header("content-type", "application/json")
            .body(body.to_string())
            .reply(&routes(SETTINGS))
            .await;

        let json = serde_json::from_slice(response.body()).expect("reply is JSON");
        (response.status(), json)
    }

    #[tokio::test]
    async fn replies_with_iteration_table() {
        let (status, json) = post(
            r#"{"function":"(x^2 - 2)/4","x0":1.5,"tolerance":0.0001,"max_iterations":50}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], Value::Bool(true));
        assert_eq!(json["message"], "Convergence achieved");
        assert!(json["f(x)"].is_number());

        let iterations = json["iterations"].as_array().expect("iterations array");
        let n = json["n"].as_u64().expect("n is an integer");
        assert_eq!(iterations.len() as u64, n + 1);
        assert_eq!(iterations[0]["x_n"], 1.5);
        assert!(iterations[0]["g_x_function"].is_string());
        assert!(iterations[1]["error"].is_number());
    }

    #[tokio::test]
    async fn rejects_bad_schema_with_400() {
        let (status, json) = post(r#"{"function":"x","x0":1}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["message"], "Input does not match required schema");
    }

    #[tokio::test]
    async fn rejects_unparsable_function_with_500() {
        let (status, json) =
            post(r#"{"function":"x + y","x0":1,"tolerance":0.1,"max_iterations":5}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Computation failed");
    }

    #[tokio::test]
    async fn rejects_iteration_counts_over_the_cap() {
        let body = format!(
            r#"{{"function":"-1/x","x0":1,"tolerance":0,"max_iterations":{}}}"#,
            MAX_ITERATIONS + 1
        );
        let (status, json) = post(&body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid input");
        assert!(json.get("iterations").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn deeply_nested_function_is_rejected_not_fatal() {
        let depth = 31_000;
        let body = format!(
            r#"{{"function":"{}x{}","x0":1,"tolerance":0.1,"max_iterations":5}}"#,
            "(".repeat(depth),
            ")".repeat(depth)
        );
        let (status, json) = post(&body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Computation failed");

        // The service keeps answering afterwards.
        let (status, _) =
            post(r#"{"function":"(x^2 - 2)/4","x0":1.5,"tolerance":0.0001,"max_iterations":50}"#)
                .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn writes_non_finite_values_as_null() {
        let (status, json) =
            post(r#"{"function":"x - 1/(x - 2)","x0":2.5,"tolerance":1e-6,"max_iterations":5}"#)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["iteration"], 2);
        assert!(json["problematic_x"].is_null());
    }

    #[tokio::test]
    async fn other_paths_and_methods_are_not_found() {
        let filter = routes(SETTINGS);

        let response = warp::test::request()
            .method("GET")
            .path("/fixed-point-iteration")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = warp::test::request()
            .method("POST")
            .path("/calculate")
            .body("{}")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
