//! Database location and connection options.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Local database file used when nothing else is configured, and as the
/// fallback when the configured database cannot be opened.
pub const DEFAULT_DATABASE_URL: &str = "prediction_questions.db";

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Where the database lives.
    ///
    /// Accepts a bare path, `sqlite:///abs/path`, `sqlite://rel/path`,
    /// `file:path`, `:memory:`, or a `libsql://` / `https://` URL for a
    /// remote libSQL server.
    #[serde(default = "default_url")]
    pub url: String,

    /// Auth token for remote libSQL servers. Ignored for local files.
    #[serde(default)]
    pub auth_token: String,

    /// Log every SQL statement at debug level.
    #[serde(default)]
    pub echo: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            auth_token: String::new(),
            echo: false,
        }
    }
}

/// A resolved database location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// A local file, or `:memory:`.
    Local(PathBuf),
    /// A remote libSQL server.
    Remote { url: String, auth_token: String },
}

impl DatabaseConfig {
    /// Configuration pointing at a local path (or `:memory:`).
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            ..Self::default()
        }
    }

    /// Resolve `url` into a concrete target.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for a remote URL without an auth
    /// token, and `ConfigError::InvalidValue` for an empty path or an
    /// unsupported scheme.
    pub fn target(&self) -> Result<DatabaseTarget, ConfigError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(self.invalid("must not be empty"));
        }

        if url.starts_with("libsql://") || url.starts_with("https://") || url.starts_with("http://")
        {
            if self.auth_token.is_empty() {
                return Err(ConfigError::NotConfigured {
                    field: "database.auth_token".into(),
                    required_by: format!("remote database '{url}'"),
                });
            }
            return Ok(DatabaseTarget::Remote {
                url: url.to_string(),
                auth_token: self.auth_token.clone(),
            });
        }

        // sqlite:///abs/path keeps its leading slash, sqlite://rel/path does not.
        let path = url
            .strip_prefix("sqlite:///")
            .map(|rest| format!("/{rest}"))
            .or_else(|| url.strip_prefix("sqlite://").map(String::from))
            .or_else(|| url.strip_prefix("file:").map(String::from))
            .unwrap_or_else(|| url.to_string());

        if let Some((scheme, _)) = path.split_once("://") {
            return Err(self.invalid(&format!("unsupported scheme '{scheme}'")));
        }
        if path.is_empty() {
            return Err(self.invalid("path must not be empty"));
        }

        Ok(DatabaseTarget::Local(PathBuf::from(path)))
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            field: "database.url".into(),
            reason: format!("{reason} (got '{}')", self.url),
        }
    }
}
