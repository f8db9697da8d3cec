use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use fixpoint_expr::Transform;
use fixpoint_solvers::fixed_point;
use thiserror::Error;

const HOST_ENV: &str = "FIXPOINT_HOST";
const PORT_ENV: &str = "FIXPOINT_PORT";

/// Settings for the HTTP service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// How `g` is derived from the submitted `f`.
    pub transform: Transform,
    /// Non-improving steps tolerated by the solver.
    pub patience: usize,
}

/// Errors that can occur while building a [`ServerConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid IP address: {value}")]
    Host { var: &'static str, value: String },

    #[error("{var} is not a valid port: {value}")]
    Port { var: &'static str, value: String },

    #[error("patience must be at least one step")]
    Patience,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            transform: Transform::default(),
            patience: fixed_point::Config::DEFAULT_PATIENCE,
        }
    }
}

impl ServerConfig {
    /// Builds a config from defaults overridden by `FIXPOINT_HOST` and
    /// `FIXPOINT_PORT`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(HOST_ENV) {
            config.host = value.parse().map_err(|_| ConfigError::Host {
                var: HOST_ENV,
                value,
            })?;
        }

        if let Some(value) = lookup(PORT_ENV) {
            config.port = value.parse().map_err(|_| ConfigError::Port {
                var: PORT_ENV,
                value,
            })?;
        }

        Ok(config)
    }

    /// Checks settings that cannot be expressed in the types.
    ///
    /// # Errors
    ///
    /// Returns an error if `patience` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patience == 0 {
            return Err(ConfigError::Patience);
        }
        Ok(())
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_port_5000() {
        let config = ServerConfig::from_lookup(|_| None).expect("defaults are valid");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|var| match var {
            HOST_ENV => Some("0.0.0.0".into()),
            PORT_ENV => Some("8080".into()),
            _ => None,
        })
        .expect("valid overrides");

        assert_eq!(config.addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServerConfig::from_lookup(|var| (var == PORT_ENV).then(|| "http".into()));
        assert_eq!(
            err,
            Err(ConfigError::Port {
                var: PORT_ENV,
                value: "http".into()
            })
        );

        let err = ServerConfig::from_lookup(|var| (var == HOST_ENV).then(|| "localhost".into()));
        assert!(matches!(err, Err(ConfigError::Host { .. })));

        let config = ServerConfig {
            patience: 0,
            ..ServerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::Patience));
    }
}
