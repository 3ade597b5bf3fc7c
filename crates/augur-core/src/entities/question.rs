use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::QuestionStatus;

/// A generated prediction question and, once known, its outcome.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    #[serde(rename = "question")]
    pub question_text: String,
    pub interest: String,
    pub source_articles: Vec<String>,
    #[serde(default)]
    pub source_links: Option<Vec<String>>,
    #[serde(with = "crate::timestamp")]
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::option")]
    #[schemars(with = "Option<String>")]
    pub resolution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<QuestionStatus>,
    #[serde(default, with = "crate::timestamp::option")]
    #[schemars(with = "Option<String>")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outcome: Option<bool>,
    #[serde(default)]
    pub resolution_note: Option<String>,
}

impl Question {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// A question as it appears in one user's viewing history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: Question,
    #[serde(with = "crate::timestamp")]
    #[schemars(with = "String")]
    pub viewed_at: DateTime<Utc>,
}
