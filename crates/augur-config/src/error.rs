//! Errors raised while loading or resolving Augur settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `AUGUR_*` variable could not be merged or extracted.
    #[error("failed to load augur settings: {0}")]
    Figment(#[from] figment::Error),

    /// A setting that the chosen database needs was left empty.
    #[error("'{field}' must be set to use {required_by}")]
    NotConfigured { field: String, required_by: String },

    /// A setting is present but unusable.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
