//! HTTP server configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_caller_header() -> String {
    "x-attest-user".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address, `host:port`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Request header carrying the upstream-asserted user id.
    #[serde(default = "default_caller_header")]
    pub caller_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            caller_header: default_caller_header(),
        }
    }
}

impl ServerConfig {
    /// Parse `bind` as a socket address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `bind` is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|e| ConfigError::InvalidValue {
            field: "server.bind".into(),
            reason: format!("{e}"),
        })
    }

    /// Check that the caller header is a usable HTTP header name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the name is empty or contains
    /// characters outside the token set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        let valid = !self.caller_header.is_empty()
            && self
                .caller_header
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "server.caller_header".into(),
                reason: format!("'{}' is not a valid header name", self.caller_header),
            })
        }
    }
}
