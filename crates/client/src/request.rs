use serde::Serialize;
use thiserror::Error;

/// The four raw values read from the form, exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub function: String,
    pub x0: String,
    pub tolerance: String,
    pub max_iterations: String,
}

impl FormInput {
    pub fn new(
        function: impl Into<String>,
        x0: impl Into<String>,
        tolerance: impl Into<String>,
        max_iterations: impl Into<String>,
    ) -> Self {
        Self {
            function: function.into(),
            x0: x0.into(),
            tolerance: tolerance.into(),
            max_iterations: max_iterations.into(),
        }
    }
}

/// How numeric fields that fail to parse are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Reject the input locally; nothing is sent.
    #[default]
    Strict,
    /// Forward unparsable values as `null` and let the service decide.
    Lenient,
}

/// A field value that could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("function: must not be empty")]
    EmptyFunction,

    #[error("{field}: {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field}: must be finite")]
    NotFinite { field: &'static str },

    #[error("{field}: {value:?} is not a whole number")]
    NotAnInteger { field: &'static str, value: String },
}

/// The JSON body posted to the solver endpoint.
///
/// Field order is the wire order. `NaN` and a missing iteration limit are
/// both written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveRequest {
    pub function: String,
    pub x0: f64,
    pub tolerance: f64,
    pub max_iterations: Option<u64>,
}

impl SolveRequest {
    /// Builds the request body from raw form values.
    ///
    /// The function text is passed through untouched.
    ///
    /// # Errors
    ///
    /// In [`InputMode::Strict`], returns an error for an empty function, a
    /// number that does not parse or is not finite, or an iteration limit
    /// that is not a non-negative integer. [`InputMode::Lenient`] never fails.
    pub fn from_form(form: &FormInput, mode: InputMode) -> Result<Self, InputError> {
        match mode {
            InputMode::Strict => Self::strict(form),
            InputMode::Lenient => Ok(Self::lenient(form)),
        }
    }

    fn strict(form: &FormInput) -> Result<Self, InputError> {
        if form.function.trim().is_empty() {
            return Err(InputError::EmptyFunction);
        }

        let max_iterations = form.max_iterations.trim().parse().map_err(|_| {
            InputError::NotAnInteger {
                field: "max_iterations",
                value: form.max_iterations.clone(),
            }
        })?;

        Ok(Self {
            function: form.function.clone(),
            x0: finite("x0", &form.x0)?,
            tolerance: finite("tolerance", &form.tolerance)?,
            max_iterations: Some(max_iterations),
        })
    }

    fn lenient(form: &FormInput) -> Self {
        let number = |text: &str| text.trim().parse().unwrap_or(f64::NAN);

        Self {
            function: form.function.clone(),
            x0: number(&form.x0),
            tolerance: number(&form.tolerance),
            max_iterations: form.max_iterations.trim().parse().ok(),
        }
    }
}

fn finite(field: &'static str, text: &str) -> Result<f64, InputError> {
    let value: f64 = text.trim().parse().map_err(|_| InputError::NotANumber {
        field,
        value: text.to_string(),
    })?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn dottie_form() -> FormInput {
        FormInput::new("cos(x)", "1.5", "0.0001", "50")
    }

    #[test]
    fn serializes_with_wire_keys_in_order() {
        let request =
            SolveRequest::from_form(&dottie_form(), InputMode::Strict).expect("valid input");

        assert_eq!(
            serde_json::to_string(&request).expect("serializable"),
            r#"{"function":"cos(x)","x0":1.5,"tolerance":0.0001,"max_iterations":50}"#
        );
    }

    #[test]
    fn passes_function_text_through() {
        let form = FormInput::new("  np.exp(-x) ", " 0.5", "1e-6 ", "10");
        let request = SolveRequest::from_form(&form, InputMode::Strict).expect("valid input");

        assert_eq!(request.function, "  np.exp(-x) ");
        assert_relative_eq!(request.x0, 0.5);
        assert_relative_eq!(request.tolerance, 1e-6);
        assert_eq!(request.max_iterations, Some(10));
    }

    #[test]
    fn strict_mode_names_the_bad_field() {
        let mut form = dottie_form();
        form.x0 = "abc".into();
        assert_eq!(
            SolveRequest::from_form(&form, InputMode::Strict),
            Err(InputError::NotANumber {
                field: "x0",
                value: "abc".into()
            })
        );

        let mut form = dottie_form();
        form.tolerance = "inf".into();
        assert_eq!(
            SolveRequest::from_form(&form, InputMode::Strict),
            Err(InputError::NotFinite { field: "tolerance" })
        );

        let mut form = dottie_form();
        form.max_iterations = "12.5".into();
        let err = SolveRequest::from_form(&form, InputMode::Strict).expect_err("not an integer");
        assert_eq!(err.to_string(), r#"max_iterations: "12.5" is not a whole number"#);

        let mut form = dottie_form();
        form.function = " ".into();
        assert_eq!(
            SolveRequest::from_form(&form, InputMode::Strict),
            Err(InputError::EmptyFunction)
        );
    }

    #[test]
    fn lenient_mode_forwards_nulls() {
        let form = FormInput::new("", "abc", "", "many");
        let request = SolveRequest::from_form(&form, InputMode::Lenient).expect("never fails");

        assert!(request.x0.is_nan());
        assert!(request.tolerance.is_nan());
        assert_eq!(request.max_iterations, None);
        assert_eq!(
            serde_json::to_value(&request).expect("serializable"),
            serde_json::json!({
                "function": "",
                "x0": null,
                "tolerance": null,
                "max_iterations": null,
            })
        );
    }
}
