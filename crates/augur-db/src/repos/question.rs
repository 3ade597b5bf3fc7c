//! Question repository — creation, listing, and the resolution lifecycle.

use chrono::{DateTime, Utc};

use augur_core::entities::Question;
use augur_core::enums::QuestionStatus;
use augur_core::errors::{CoreError, ensure_id};
use augur_core::interest::{normalize_filter, normalize_interest};
use augur_core::resolution::{extract_resolution_date, truncate_note};

use crate::AugurDb;
use crate::error::DatabaseError;
use crate::helpers::{
    decode_list, decode_optional_list, encode_list, get_opt_bool, get_opt_string, parse_datetime,
    parse_enum, parse_optional_datetime, to_owned_list, to_storage,
};

/// Column list shared by every query that builds a [`Question`].
/// Callers alias `questions` as `q`.
pub(crate) const QUESTION_COLUMNS: &str = "q.id, q.question_text, q.interest, q.source_articles, \
     q.source_links, q.created_at, q.resolution_date, q.status, q.resolved_at, q.outcome, \
     q.resolution_note";

/// Number of columns in [`QUESTION_COLUMNS`].
pub(crate) const QUESTION_COLUMN_COUNT: i32 = 11;

pub(crate) fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    Ok(Question {
        id: row.get::<i64>(0)?,
        question_text: row.get::<String>(1)?,
        interest: row.get::<String>(2)?,
        source_articles: decode_list(&row.get::<String>(3)?)?,
        source_links: decode_optional_list(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        resolution_date: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        status: get_opt_string(row, 7)?
            .as_deref()
            .map(parse_enum::<QuestionStatus>)
            .transpose()?,
        resolved_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        outcome: get_opt_bool(row, 9)?,
        resolution_note: get_opt_string(row, 10)?,
    })
}

/// Field values of a question about to be inserted.
struct NewQuestion<'a> {
    question_text: &'a str,
    interest: String,
    source_articles: Vec<String>,
    source_links: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    resolution_date: Option<DateTime<Utc>>,
    status: Option<QuestionStatus>,
}

fn validate_text(question_text: &str) -> Result<(), CoreError> {
    if question_text.trim().is_empty() {
        return Err(CoreError::invalid("question_text must not be empty"));
    }
    Ok(())
}

impl AugurDb {
    async fn insert_question(&self, new: NewQuestion<'_>) -> Result<i64, DatabaseError> {
        let links = new.source_links.as_deref().map(encode_list).transpose()?;

        let id = self
            .query_opt(
                "INSERT INTO questions (question_text, interest, source_articles, source_links, created_at, resolution_date, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
                libsql::params![
                    new.question_text,
                    new.interest.as_str(),
                    encode_list(&new.source_articles)?,
                    links,
                    to_storage(&new.created_at),
                    new.resolution_date.as_ref().map(to_storage),
                    new.status.map(QuestionStatus::as_str)
                ],
                |row| Ok(row.get::<i64>(0)?),
            )
            .await
            .inspect_err(|error| {
                tracing::error!(%error, interest = %new.interest, "question insert failed");
            })?
            .ok_or(DatabaseError::NoResult)?;

        tracing::info!(question_id = id, interest = %new.interest, "question saved");
        Ok(id)
    }

    /// Save a generated question as `pending`, deriving its resolution date
    /// from time phrases in the text. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for empty text or interest.
    pub async fn save_question<I, S>(
        &self,
        question_text: &str,
        interest: &str,
        source_articles: I,
    ) -> Result<i64, DatabaseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_text(question_text)?;
        let now = Utc::now();
        self.insert_question(NewQuestion {
            question_text,
            interest: normalize_interest(interest)?,
            source_articles: to_owned_list(source_articles),
            source_links: None,
            created_at: now,
            resolution_date: Some(extract_resolution_date(question_text, now)),
            status: Some(QuestionStatus::Pending),
        })
        .await
    }

    /// Insert a question with explicit source links. Unlike
    /// [`AugurDb::save_question`], no resolution date or status is set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for empty text or interest.
    pub async fn create_question<A, SA, L, SL>(
        &self,
        question_text: &str,
        interest: &str,
        source_articles: A,
        source_links: L,
    ) -> Result<i64, DatabaseError>
    where
        A: IntoIterator<Item = SA>,
        SA: AsRef<str>,
        L: IntoIterator<Item = SL>,
        SL: AsRef<str>,
    {
        validate_text(question_text)?;
        self.insert_question(NewQuestion {
            question_text,
            interest: normalize_interest(interest)?,
            source_articles: to_owned_list(source_articles),
            source_links: Some(to_owned_list(source_links)),
            created_at: Utc::now(),
            resolution_date: None,
            status: None,
        })
        .await
    }

    /// Fetch one question by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be decoded.
    pub async fn get_question(&self, question_id: i64) -> Result<Option<Question>, DatabaseError> {
        self.query_opt(
            &format!("SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.id = ?1"),
            [question_id],
            row_to_question,
        )
        .await
    }

    /// All questions, optionally restricted to one interest, in id order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty interest filter.
    pub async fn get_questions(&self, interest: Option<&str>) -> Result<Vec<Question>, DatabaseError> {
        match normalize_filter(interest)? {
            Some(interest) => {
                self.query_map(
                    &format!(
                        "SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.interest = ?1 ORDER BY q.id"
                    ),
                    [interest.as_str()],
                    row_to_question,
                )
                .await
            }
            None => {
                self.query_map(
                    &format!("SELECT {QUESTION_COLUMNS} FROM questions q ORDER BY q.id"),
                    (),
                    row_to_question,
                )
                .await
            }
        }
    }

    /// Questions that have no outcome yet, soonest resolution date first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_pending_resolutions(&self) -> Result<Vec<Question>, DatabaseError> {
        self.query_map(
            &format!(
                "SELECT {QUESTION_COLUMNS} FROM questions q
                 WHERE q.resolved_at IS NULL
                 ORDER BY q.resolution_date ASC NULLS LAST, q.id ASC"
            ),
            (),
            row_to_question,
        )
        .await
    }

    /// Record the outcome of a question.
    ///
    /// The note is cut to 500 characters; an empty note is stored as NULL.
    /// Returns the resolved question, or `None` if no question has this id.
    /// Resolution is one-way.
    ///
    /// The transaction takes the write lock up front (`BEGIN IMMEDIATE`), so
    /// concurrent resolvers queue on the busy timeout instead of failing a
    /// read-to-write lock upgrade.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::AlreadyResolved` if the question already has
    /// an outcome (nothing is changed), `InvalidArgument` for `question_id < 1`.
    pub async fn resolve_question(
        &self,
        question_id: i64,
        result: bool,
        note: Option<&str>,
    ) -> Result<Option<Question>, DatabaseError> {
        ensure_id("question_id", question_id)?;
        let note = note.filter(|n| !n.is_empty()).map(truncate_note);
        let now = Utc::now();

        let conn = self.acquire().await?;
        let tx = conn
            .transaction_with_behavior(libsql::TransactionBehavior::Immediate)
            .await?;
        let applied = self
            .apply_resolution(&tx, question_id, result, note.as_deref(), &now)
            .await;
        match applied {
            Ok(true) => tx.commit().await?,
            Ok(false) => {
                tx.rollback().await?;
                tracing::warn!(question_id, "resolve_question: no such question");
                return Ok(None);
            }
            Err(error) => {
                tracing::error!(%error, question_id, "resolve_question failed; rolling back");
                tx.rollback().await?;
                return Err(error);
            }
        }

        tracing::info!(question_id, outcome = result, "question resolved");
        self.get_question(question_id).await
    }

    /// Returns `Ok(false)` if the question does not exist.
    async fn apply_resolution(
        &self,
        tx: &libsql::Transaction,
        question_id: i64,
        result: bool,
        note: Option<&str>,
        now: &DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let select = "SELECT status, resolved_at FROM questions WHERE id = ?1";
        self.trace_sql(select);
        let (status, already_resolved) = {
            let mut rows = tx.query(select, [question_id]).await?;
            let Some(row) = rows.next().await? else {
                return Ok(false);
            };
            let status = get_opt_string(&row, 0)?
                .as_deref()
                .map(parse_enum::<QuestionStatus>)
                .transpose()?
                .unwrap_or(QuestionStatus::Pending);
            (status, get_opt_string(&row, 1)?.is_some())
        };

        if already_resolved || !status.can_transition_to(QuestionStatus::Resolved) {
            return Err(DatabaseError::AlreadyResolved { question_id });
        }

        let update = "UPDATE questions SET resolved_at = ?1, outcome = ?2, resolution_note = ?3, status = ?4 WHERE id = ?5";
        self.trace_sql(update);
        tx.execute(
            update,
            libsql::params![
                to_storage(now),
                i64::from(result),
                note,
                QuestionStatus::Resolved.as_str(),
                question_id
            ],
        )
        .await?;
        Ok(true)
    }
}
