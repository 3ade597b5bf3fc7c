//! User repository — create, lookup, interest updates.

use chrono::Utc;

use augur_core::entities::User;
use augur_core::errors::{CoreError, ensure_id};
use augur_core::interest::normalize_interests;

use crate::AugurDb;
use crate::error::DatabaseError;
use crate::helpers::{conflict_on_unique, decode_list, encode_list, parse_datetime, to_storage};

/// Longest username the schema accepts, in characters.
pub const MAX_USERNAME_CHARS: usize = 50;

const USER_COLUMNS: &str = "id, username, interests, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<i64>(0)?,
        username: row.get::<String>(1)?,
        interests: decode_list(&row.get::<String>(2)?)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.trim().is_empty() {
        return Err(CoreError::invalid("username must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(CoreError::invalid(format!(
            "username must be at most {MAX_USERNAME_CHARS} characters"
        )));
    }
    Ok(())
}

impl AugurDb {
    /// Create a user and return their id.
    ///
    /// Interests are trimmed and lowercased before storage.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty or over-long username or an
    /// empty interest, `DatabaseError::Conflict` if the username is taken.
    pub async fn create_user<I, S>(&self, username: &str, interests: I) -> Result<i64, DatabaseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_username(username)?;
        let interests = normalize_interests(interests)?;
        let now = Utc::now();

        let id = self
            .query_opt(
                "INSERT INTO users (username, interests, created_at) VALUES (?1, ?2, ?3) RETURNING id",
                libsql::params![username, encode_list(&interests)?, to_storage(&now)],
                |row| Ok(row.get::<i64>(0)?),
            )
            .await
            .map_err(|e| conflict_on_unique(e, || format!("username '{username}' is already taken")))
            .inspect_err(|error| tracing::error!(%error, username, "create_user failed"))?
            .ok_or(DatabaseError::NoResult)?;

        tracing::info!(user_id = id, username, "user created");
        Ok(id)
    }

    /// Look a user up by exact username.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be decoded.
    pub async fn get_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.query_opt(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            [username],
            row_to_user,
        )
        .await
    }

    /// Look a user up by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be decoded.
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        self.query_opt(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [user_id],
            row_to_user,
        )
        .await
    }

    /// Replace a user's interests with the lowercased `interests`.
    ///
    /// Returns the updated user, or `None` if no user has this id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for `user_id < 1` or an empty interest.
    pub async fn update_user_interests<I, S>(
        &self,
        user_id: i64,
        interests: I,
    ) -> Result<Option<User>, DatabaseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ensure_id("user_id", user_id)?;
        let interests = normalize_interests(interests)?;

        let changed = self
            .execute(
                "UPDATE users SET interests = ?1 WHERE id = ?2",
                libsql::params![encode_list(&interests)?, user_id],
            )
            .await
            .inspect_err(|error| tracing::error!(%error, user_id, "update_user_interests failed"))?;

        if changed == 0 {
            tracing::warn!(user_id, "update_user_interests: no such user");
            return Ok(None);
        }
        self.get_user_by_id(user_id).await
    }
}
