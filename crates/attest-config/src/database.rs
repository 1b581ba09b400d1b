//! Database configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".attest/attest.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// libSQL database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }

    /// Directory that must exist before the database file can be created.
    #[must_use]
    pub fn parent_dir(&self) -> Option<&Path> {
        if self.is_in_memory() {
            return None;
        }
        Path::new(&self.path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}
