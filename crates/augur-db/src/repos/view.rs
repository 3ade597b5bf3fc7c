//! Viewing history — which questions each user has been shown, and
//! selection of questions a user has not seen yet.

use chrono::Utc;

use augur_core::entities::{Question, QuestionView};
use augur_core::errors::{CoreError, ensure_id};
use augur_core::interest::{normalize_filter, normalize_interest};

use crate::AugurDb;
use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, to_storage};
use crate::repos::question::{QUESTION_COLUMN_COUNT, QUESTION_COLUMNS, row_to_question};

/// Questions in `interest` with no view row for the user.
const UNUSED_PREDICATE: &str = "q.interest = ?1 AND NOT EXISTS (
         SELECT 1 FROM user_questions uq WHERE uq.question_id = q.id AND uq.user_id = ?2)";

fn row_to_view(row: &libsql::Row) -> Result<QuestionView, DatabaseError> {
    Ok(QuestionView {
        question: row_to_question(row)?,
        viewed_at: parse_datetime(&row.get::<String>(QUESTION_COLUMN_COUNT)?)?,
    })
}

impl AugurDb {
    /// A random question in `interest` that the user has not viewed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty interest or `user_id < 1`.
    pub async fn get_unused_question(
        &self,
        interest: &str,
        user_id: i64,
    ) -> Result<Option<Question>, DatabaseError> {
        let interest = normalize_interest(interest)?;
        ensure_id("user_id", user_id)?;

        self.query_opt(
            &format!(
                "SELECT {QUESTION_COLUMNS} FROM questions q WHERE {UNUSED_PREDICATE}
                 ORDER BY RANDOM() LIMIT 1"
            ),
            libsql::params![interest.as_str(), user_id],
            row_to_question,
        )
        .await
    }

    /// Up to `count` random questions in `interest` the user has not viewed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty interest, `user_id < 1` or
    /// `count == 0`.
    pub async fn get_multiple_unused_questions(
        &self,
        interest: &str,
        user_id: i64,
        count: u32,
    ) -> Result<Vec<Question>, DatabaseError> {
        let interest = normalize_interest(interest)?;
        ensure_id("user_id", user_id)?;
        if count == 0 {
            return Err(CoreError::invalid("count must be at least 1").into());
        }

        self.query_map(
            &format!(
                "SELECT {QUESTION_COLUMNS} FROM questions q WHERE {UNUSED_PREDICATE}
                 ORDER BY RANDOM() LIMIT ?3"
            ),
            libsql::params![interest.as_str(), user_id, i64::from(count)],
            row_to_question,
        )
        .await
    }

    /// [`AugurDb::get_multiple_unused_questions`] with the configured batch size.
    ///
    /// # Errors
    ///
    /// Same as [`AugurDb::get_multiple_unused_questions`].
    pub async fn get_unused_batch(
        &self,
        interest: &str,
        user_id: i64,
    ) -> Result<Vec<Question>, DatabaseError> {
        self.get_multiple_unused_questions(interest, user_id, self.unused_batch_size())
            .await
    }

    /// Record that the user was shown the question.
    ///
    /// Returns `true` if this is the first view of the pair; a repeated view
    /// keeps the original timestamp and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for ids `< 1`, or a libSQL foreign key error
    /// if the user or question does not exist.
    pub async fn mark_question_as_viewed(
        &self,
        question_id: i64,
        user_id: i64,
    ) -> Result<bool, DatabaseError> {
        ensure_id("question_id", question_id)?;
        ensure_id("user_id", user_id)?;
        let now = Utc::now();

        let inserted = self
            .execute(
                "INSERT INTO user_questions (user_id, question_id, viewed_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id, question_id) DO NOTHING",
                libsql::params![user_id, question_id, to_storage(&now)],
            )
            .await
            .inspect_err(|error| {
                tracing::error!(%error, user_id, question_id, "mark_question_as_viewed failed");
            })?;

        if inserted == 0 {
            tracing::debug!(user_id, question_id, "question already viewed");
        }
        Ok(inserted > 0)
    }

    /// Questions the user has viewed, most recent first, optionally
    /// restricted to one interest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for `user_id < 1` or an empty interest filter.
    pub async fn get_user_question_history(
        &self,
        user_id: i64,
        interest: Option<&str>,
    ) -> Result<Vec<QuestionView>, DatabaseError> {
        ensure_id("user_id", user_id)?;
        let interest = normalize_filter(interest)?;

        let interest_clause = if interest.is_some() {
            "AND q.interest = ?2"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {QUESTION_COLUMNS}, uq.viewed_at
             FROM user_questions uq
             JOIN questions q ON q.id = uq.question_id
             WHERE uq.user_id = ?1 {interest_clause}
             ORDER BY uq.viewed_at DESC, uq.rowid DESC"
        );

        let mut params: Vec<libsql::Value> = vec![user_id.into()];
        if let Some(interest) = interest {
            params.push(interest.into());
        }
        self.query_map(&sql, libsql::params_from_iter(params), row_to_view)
            .await
    }
}
