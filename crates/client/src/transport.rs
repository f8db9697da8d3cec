use std::{future::Future, time::Duration};

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::{ClientConfig, ConfigError},
    request::SolveRequest,
};

/// Ways a request can fail before a JSON body is in hand.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("request was cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// Delivers a request body to the solver and returns the decoded reply.
///
/// The HTTP status is not inspected: error replies carry JSON bodies that
/// are rendered like any other reply.
pub trait Transport {
    /// Posts `request` as JSON and decodes the reply body.
    fn post(
        &self,
        request: &SolveRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Creates a transport for the config's endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.validate()?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        request: &SolveRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        let call = self.client.post(self.endpoint.clone()).json(request);

        async move {
            let bytes = call.send().await?.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}
