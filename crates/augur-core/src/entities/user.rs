use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A person receiving questions. Interests are stored lowercase.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub interests: Vec<String>,
    #[serde(with = "crate::timestamp")]
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user follows the (already normalized) `interest`.
    #[must_use]
    pub fn follows(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i == interest)
    }
}
