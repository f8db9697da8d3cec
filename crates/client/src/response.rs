use serde::Deserialize;
use serde_json::Value;

/// Message shown when the service answers with JSON of an unexpected shape.
pub const MALFORMED: &str = "Malformed response from the API server.";

/// A solver reply, classified by its `success` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveResponse {
    Converged(Report),
    Failed(Failure),
}

/// The fields of a successful reply.
///
/// Non-finite numbers travel as `null` and decode to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Report {
    pub x: Option<f64>,
    #[serde(rename = "f(x)", default)]
    pub fx: Option<f64>,
    pub n: u64,
    #[serde(default)]
    pub error: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub iterations: Option<Vec<IterationRecord>>,
}

/// One row of the per-iteration table. Only `x_n` is used.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct IterationRecord {
    #[serde(default)]
    pub x_n: Option<f64>,
}

/// The fields of a failed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    /// Iteration the solver stopped at, `0` when not reported.
    pub iteration: u64,
}

impl SolveResponse {
    /// Classifies a decoded reply body.
    ///
    /// Only a literal `"success": true` counts as success. Anything else is a
    /// failure; a failure without a `message` falls back to the service's
    /// `error` field.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let Some(object) = body.as_object() else {
            return Self::malformed();
        };

        if object.get("success") == Some(&Value::Bool(true)) {
            return match Report::deserialize(body) {
                Ok(report) => Self::Converged(report),
                Err(_) => Self::malformed(),
            };
        }

        let text = |key: &str| object.get(key).and_then(Value::as_str);
        let message = text("message").or_else(|| text("error")).unwrap_or("Unknown error");
        let iteration = object.get("iteration").and_then(Value::as_u64).unwrap_or(0);

        Self::Failed(Failure {
            message: message.to_string(),
            iteration,
        })
    }

    fn malformed() -> Self {
        Self::Failed(Failure {
            message: MALFORMED.to_string(),
            iteration: 0,
        })
    }
}

impl Report {
    /// The `x_n` series in iteration order, or `None` when the reply has no
    /// iteration table.
    #[must_use]
    pub fn series(&self) -> Option<Vec<f64>> {
        self.iterations.as_ref().map(|rows| {
            rows.iter()
                .map(|row| row.x_n.unwrap_or(f64::NAN))
                .collect()
        })
    }
}

/// Formats a number the way a browser prints it.
///
/// Magnitudes in `[1e-6, 1e21)` use positional notation, everything else
/// uses exponent notation with an explicit sign on positive exponents.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => text,
    }
}

/// Formats an optional number, showing `NaN` for a missing one.
#[must_use]
pub fn format_optional(value: Option<f64>) -> String {
    format_number(value.unwrap_or(f64::NAN))
}
