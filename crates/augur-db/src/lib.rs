//! # augur-db
//!
//! libSQL data access for Augur: users, generated prediction questions,
//! per-user viewing history, and question resolution.
//!
//! [`AugurDb`] owns the database and hands out one connection per
//! operation. File-backed and remote databases therefore tolerate a shared
//! `AugurDb` (e.g. behind an `Arc`) across tasks. An in-memory database only
//! exists on a single connection, so that mode pins one shared connection;
//! it is meant for tests and gives concurrent callers no isolation.
//!
//! Every operation returns `Result<_, DatabaseError>`. Lookups that find
//! nothing, and writes that target a missing row, return `Ok(None)` or an
//! empty `Vec` rather than an error.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

#[cfg(test)]
mod test_support;

use augur_config::{AugurConfig, DEFAULT_UNUSED_BATCH, DatabaseConfig, DatabaseTarget};
use libsql::Builder;
use libsql::params::IntoParams;

use error::DatabaseError;

const MEMORY: &str = ":memory:";

/// How long a file-backed connection waits on a locked database, in ms.
const BUSY_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Memory,
    File,
    Remote,
}

/// Central database handle for all Augur state operations.
pub struct AugurDb {
    db: libsql::Database,
    mode: Mode,
    /// The only connection of an in-memory database.
    pinned: Option<libsql::Connection>,
    echo: bool,
    unused_batch: u32,
}

impl AugurDb {
    /// Open a local database file, or `":memory:"`, with default settings.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let target = DatabaseConfig::local(path).target()?;
        Self::open_target(&target, false, DEFAULT_UNUSED_BATCH).await
    }

    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Config` if the database URL cannot be resolved,
    /// or `DatabaseError` if opening or migrating fails.
    pub async fn open(config: &AugurConfig) -> Result<Self, DatabaseError> {
        config.general.validate()?;
        let target = config.database.target()?;
        Self::open_target(&target, config.database.echo, config.general.unused_batch_size).await
    }

    /// Open the configured database, falling back to the default local file
    /// (`prediction_questions.db`) if that fails.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only if the fallback cannot be opened either.
    pub async fn open_with_fallback(config: &AugurConfig) -> Result<Self, DatabaseError> {
        Self::open_or(config, &DatabaseConfig::default()).await
    }

    /// Open the configured database, falling back to `fallback` if that fails.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only if the fallback cannot be opened either.
    pub async fn open_or(
        config: &AugurConfig,
        fallback: &DatabaseConfig,
    ) -> Result<Self, DatabaseError> {
        match Self::open(config).await {
            Ok(db) => Ok(db),
            Err(error) => {
                tracing::warn!(
                    %error,
                    url = %config.database.url,
                    fallback = %fallback.url,
                    "configured database unavailable; using fallback"
                );
                let target = fallback.target()?;
                let batch = config.general.unused_batch_size.max(1);
                Self::open_target(&target, fallback.echo, batch).await
            }
        }
    }

    async fn open_target(
        target: &DatabaseTarget,
        echo: bool,
        unused_batch: u32,
    ) -> Result<Self, DatabaseError> {
        let (db, mode) = match target {
            DatabaseTarget::Local(path) if path.as_os_str() == MEMORY => {
                (Builder::new_local(MEMORY).build().await?, Mode::Memory)
            }
            DatabaseTarget::Local(path) => (Builder::new_local(path).build().await?, Mode::File),
            DatabaseTarget::Remote { url, auth_token } => (
                Builder::new_remote(url.clone(), auth_token.clone())
                    .build()
                    .await?,
                Mode::Remote,
            ),
        };

        let pinned = match mode {
            Mode::Memory => Some(Self::prepare_connection(db.connect()?, mode).await?),
            Mode::File | Mode::Remote => None,
        };

        let augur = Self {
            db,
            mode,
            pinned,
            echo,
            unused_batch,
        };

        if mode == Mode::File {
            // WAL lets readers proceed while another connection writes.
            let conn = augur.acquire().await?;
            let mut rows = conn.query("PRAGMA journal_mode = WAL", ()).await?;
            rows.next().await?;
        }

        augur.run_migrations().await?;
        tracing::debug!(?mode, "database opened");
        Ok(augur)
    }

    /// Per-connection settings. SQLite does not persist these.
    async fn prepare_connection(
        conn: libsql::Connection,
        mode: Mode,
    ) -> Result<libsql::Connection, DatabaseError> {
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        if mode == Mode::File {
            // PRAGMAs that report a value only take effect once stepped.
            let mut rows = conn
                .query(&format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"), ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
            rows.next()
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
        }
        Ok(conn)
    }

    /// Acquire a connection for one unit of work.
    ///
    /// In-memory databases return the pinned connection; all other modes open
    /// a fresh connection that is closed when the caller drops it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a new connection cannot be opened.
    pub async fn acquire(&self) -> Result<libsql::Connection, DatabaseError> {
        if let Some(conn) = &self.pinned {
            return Ok(conn.clone());
        }
        Self::prepare_connection(self.db.connect()?, self.mode).await
    }

    /// Whether this handle is backed by an in-memory database.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.mode == Mode::Memory
    }

    /// Batch size used by [`AugurDb::get_unused_batch`].
    #[must_use]
    pub const fn unused_batch_size(&self) -> u32 {
        self.unused_batch
    }

    fn trace_sql(&self, sql: &str) {
        if self.echo {
            tracing::debug!(target: "augur_db::sql", sql = sql.trim(), "statement");
        }
    }

    /// Execute one statement on its own connection, returning affected rows.
    pub(crate) async fn execute(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<u64, DatabaseError> {
        let conn = self.acquire().await?;
        self.trace_sql(sql);
        Ok(conn.execute(sql, params).await?)
    }

    /// Run a query on its own connection and map every row.
    pub(crate) async fn query_map<T>(
        &self,
        sql: &str,
        params: impl IntoParams,
        map: impl Fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Vec<T>, DatabaseError> {
        let conn = self.acquire().await?;
        self.trace_sql(sql);
        let mut rows = conn.query(sql, params).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map(&row)?);
        }
        Ok(out)
    }

    /// Run a query on its own connection and map the first row, if any.
    pub(crate) async fn query_opt<T>(
        &self,
        sql: &str,
        params: impl IntoParams,
        map: impl FnOnce(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Option<T>, DatabaseError> {
        let conn = self.acquire().await?;
        self.trace_sql(sql);
        let mut rows = conn.query(sql, params).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(map(&row)?)),
            None => Ok(None),
        }
    }
}
