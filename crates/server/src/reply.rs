use serde::Serialize;

/// One row of the iteration table returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Iterate {
    pub n: usize,
    pub x_n: f64,
    #[serde(rename = "f(x_n)")]
    pub fx_n: f64,
    /// Step from the previous iterate; absent on the initial guess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    /// Text of the iteration map, present on the initial guess only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g_x_function: Option<String>,
}

/// Body of a `200 OK` reply, for both converged and failed solves.
///
/// Non-finite numbers are written as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SolveReply {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(rename = "f(x)", skip_serializing_if = "Option::is_none")]
    pub fx: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,

    /// Iteration at which a failed solve stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problematic_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_n: Option<f64>,
    #[serde(rename = "f(x_n)", skip_serializing_if = "Option::is_none")]
    pub fx_n: Option<f64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub iterations: Vec<Iterate>,
}

/// Body of a `400` or `500` reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReply {
    pub error: &'static str,
    pub message: String,
}

impl ErrorReply {
    pub const INVALID_INPUT: &'static str = "Invalid input";
    pub const COMPUTATION_FAILED: &'static str = "Computation failed";

    /// The reply for a body that does not match the request schema.
    #[must_use]
    pub fn schema() -> Self {
        Self {
            error: Self::INVALID_INPUT,
            message: "Input does not match required schema".to_string(),
        }
    }
}
