use std::{env, time::Duration};

use reqwest::Url;
use thiserror::Error;

use crate::request::InputMode;

/// Endpoint of a locally running solver service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/fixed-point-iteration";

/// Identifier of the drawing surface charts are bound to.
pub const DEFAULT_CANVAS: &str = "convergenceChart";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const ENDPOINT_ENV: &str = "FIXPOINT_ENDPOINT";
const TIMEOUT_ENV: &str = "FIXPOINT_TIMEOUT_SECS";

/// Settings for a [`Handler`](crate::Handler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute URL requests are posted to.
    pub endpoint: String,
    /// Upper bound on one request, from dispatch to decoded body.
    pub timeout: Duration,
    /// Canvas the convergence chart is bound to.
    pub canvas: String,
    /// How the four raw field values are turned into numbers.
    pub inputs: InputMode,
}

/// Errors that can occur while building a [`ClientConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint is not an absolute http(s) URL: {0}")]
    Endpoint(String),

    #[error("timeout must be greater than zero")]
    Timeout,

    #[error("{var} is not a whole number of seconds: {value}")]
    TimeoutVar { var: &'static str, value: String },

    #[error("canvas id must not be empty")]
    Canvas,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            canvas: DEFAULT_CANVAS.to_string(),
            inputs: InputMode::default(),
        }
    }
}

impl ClientConfig {
    /// Builds a config from defaults overridden by `FIXPOINT_ENDPOINT` and
    /// `FIXPOINT_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Some(value) = lookup(TIMEOUT_ENV) {
            let secs = value.trim().parse().map_err(|_| ConfigError::TimeoutVar {
                var: TIMEOUT_ENV,
                value: value.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_canvas(mut self, canvas: impl Into<String>) -> Self {
        self.canvas = canvas.into();
        self
    }

    #[must_use]
    pub fn with_inputs(mut self, inputs: InputMode) -> Self {
        self.inputs = inputs;
        self
    }

    /// Checks the config and returns the parsed endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute `http`/`https` URL,
    /// the timeout is zero, or the canvas id is empty.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::Endpoint(self.endpoint.clone()))?;

        if self.timeout.is_zero() {
            return Err(ConfigError::Timeout);
        }
        if self.canvas.is_empty() {
            return Err(ConfigError::Canvas);
        }

        Ok(url)
    }
}
