//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default number of unused questions fetched per batch.
pub const DEFAULT_UNUSED_BATCH: u32 = 5;

const fn default_unused_batch_size() -> u32 {
    DEFAULT_UNUSED_BATCH
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// How many unused questions a batch lookup returns when the caller
    /// does not ask for a specific count.
    #[serde(default = "default_unused_batch_size")]
    pub unused_batch_size: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            unused_batch_size: default_unused_batch_size(),
        }
    }
}

impl GeneralConfig {
    /// Reject values no lookup could honor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `unused_batch_size` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unused_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.unused_batch_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
