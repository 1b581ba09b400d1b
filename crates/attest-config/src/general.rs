//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Fallback tracing level when `ATTEST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl GeneralConfig {
    /// Check that `log_level` names a tracing level.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for anything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "general.log_level".into(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            })
        }
    }
}
