//! Shared test utilities for augur-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use tracing_subscriber::EnvFilter;

    use crate::AugurDb;

    /// Install a test-writer subscriber once. Filter via `AUGUR_LOG`.
    pub fn init_tracing() {
        let filter =
            EnvFilter::try_from_env("AUGUR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }

    /// Create an in-memory AugurDb with migrations applied.
    pub async fn test_db() -> AugurDb {
        init_tracing();
        AugurDb::open_local(":memory:").await.unwrap()
    }

    /// Create a user following "tech" and return their id.
    pub async fn seed_user(db: &AugurDb, username: &str) -> i64 {
        db.create_user(username, ["tech"]).await.unwrap()
    }

    /// Save a pending question with one source article and return its id.
    pub async fn seed_question(db: &AugurDb, text: &str, interest: &str) -> i64 {
        db.save_question(text, interest, ["https://example.com/source"])
            .await
            .unwrap()
    }
}
