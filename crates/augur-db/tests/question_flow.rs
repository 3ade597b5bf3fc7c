//! End-to-end flows through the public `AugurDb` API:
//! - user onboarding and interest updates
//! - serving unused questions and recording views
//! - resolving questions and draining the pending queue
//! - sharing one file-backed handle between concurrent callers

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use augur_config::{AugurConfig, DatabaseConfig, GeneralConfig};
use augur_core::enums::QuestionStatus;
use augur_db::AugurDb;
use augur_db::error::DatabaseError;

async fn memory_db() -> AugurDb {
    AugurDb::open_local(":memory:").await.unwrap()
}

async fn file_db(dir: &TempDir) -> AugurDb {
    let path = dir.path().join("questions.db");
    AugurDb::open_local(path.to_str().unwrap()).await.unwrap()
}

// ---------------------------------------------------------------------------
// Serving questions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn serve_until_exhausted() {
    let db = memory_db().await;
    let user = db.create_user("alice", ["tech"]).await.unwrap();
    let mut expected = HashSet::new();
    for i in 0..4 {
        expected.insert(
            db.save_question(&format!("Will product {i} ship this week?"), "tech", ["a"])
                .await
                .unwrap(),
        );
    }

    let mut served = HashSet::new();
    while let Some(q) = db.get_unused_question("tech", user).await.unwrap() {
        assert!(served.insert(q.id), "question {} served twice", q.id);
        db.mark_question_as_viewed(q.id, user).await.unwrap();

        let batch = db
            .get_multiple_unused_questions("tech", user, 10)
            .await
            .unwrap();
        assert!(batch.iter().all(|b| !served.contains(&b.id)));
    }

    assert_eq!(served, expected);
    assert_eq!(
        db.get_user_question_history(user, Some("tech"))
            .await
            .unwrap()
            .len(),
        4
    );
}

#[tokio::test]
async fn interests_follow_updates() {
    let db = memory_db().await;
    let user = db.create_user("dana", ["tech"]).await.unwrap();
    db.save_question("Who wins the final this weekend?", "sports", ["s"])
        .await
        .unwrap();

    let updated = db
        .update_user_interests(user, ["Sports", "NEWS"])
        .await
        .unwrap()
        .unwrap();
    assert!(updated.follows("sports"));

    let fetched = db.get_user("dana").await.unwrap().unwrap();
    assert_eq!(fetched.interests, vec!["sports", "news"]);

    for interest in &fetched.interests {
        // only "sports" has a question
        let found = db.get_unused_question(interest, user).await.unwrap();
        assert_eq!(found.is_some(), interest == "sports");
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_drains_pending_queue() {
    let db = memory_db().await;
    let tomorrow = db
        .save_question("Will the vote pass tomorrow?", "politics", ["p"])
        .await
        .unwrap();
    let later = db
        .save_question("Will turnout exceed 60%?", "politics", ["p"])
        .await
        .unwrap();

    let pending = db.get_pending_resolutions().await.unwrap();
    assert_eq!(pending.iter().map(|q| q.id).collect::<Vec<_>>(), vec![tomorrow, later]);
    let first = &pending[0];
    assert_eq!(
        first.resolution_date,
        Some(first.created_at + Duration::days(1))
    );

    let resolved = db
        .resolve_question(tomorrow, true, Some("passed 52-48"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.status, Some(QuestionStatus::Resolved));

    let pending: Vec<i64> = db
        .get_pending_resolutions()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(pending, vec![later]);

    // resolved questions still appear in the full listing
    let all = db.get_questions(Some("politics")).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].outcome, Some(true));
    assert_eq!(all[0].resolution_note.as_deref(), Some("passed 52-48"));
}

#[tokio::test]
async fn second_resolution_rejected() {
    let db = memory_db().await;
    let id = db
        .save_question("Will it rain tomorrow?", "weather", ["w"])
        .await
        .unwrap();

    db.resolve_question(id, false, None).await.unwrap();
    let err = db.resolve_question(id, true, Some("late correction")).await;
    assert!(matches!(err, Err(DatabaseError::AlreadyResolved { .. })));

    let q = db.get_question(id).await.unwrap().unwrap();
    assert_eq!(q.outcome, Some(false));
    assert_eq!(q.resolution_note, None);
}

// ---------------------------------------------------------------------------
// Caller-facing JSON
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_json_uses_display_timestamps() {
    let db = memory_db().await;
    let user = db.create_user("erin", ["tech"]).await.unwrap();
    let q = db
        .create_question("Will the API launch?", "tech", ["a"], ["https://l.example"])
        .await
        .unwrap();
    db.mark_question_as_viewed(q, user).await.unwrap();

    let history = db.get_user_question_history(user, None).await.unwrap();
    let value = serde_json::to_value(&history).unwrap();
    let entry = &value[0];

    assert_eq!(entry["question"], "Will the API launch?");
    assert_eq!(entry["source_links"][0], "https://l.example");
    let viewed_at = entry["viewed_at"].as_str().unwrap();
    assert_eq!(viewed_at.len(), "YYYY-MM-DD HH:MM:SS".len());
    assert_eq!(&viewed_at[10..11], " ");
}

// ---------------------------------------------------------------------------
// Opening and sharing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_from_config_file_url() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("cfg.db").display());
    let config = AugurConfig {
        database: DatabaseConfig::local(url),
        general: GeneralConfig {
            unused_batch_size: 2,
        },
    };

    let db = AugurDb::open(&config).await.unwrap();
    assert!(!db.is_memory());
    let user = db.create_user("frank", ["tech"]).await.unwrap();
    for i in 0..3 {
        db.save_question(&format!("Q{i}?"), "tech", ["a"])
            .await
            .unwrap();
    }
    assert_eq!(db.get_unused_batch("tech", user).await.unwrap().len(), 2);
}

#[tokio::test]
async fn file_handle_serves_interleaved_callers() {
    let dir = TempDir::new().unwrap();
    let db = file_db(&dir).await;

    let alice = db.create_user("alice", ["tech"]).await.unwrap();
    let bob = db.create_user("bob", ["tech"]).await.unwrap();
    let q = db.save_question("Shared?", "tech", ["a"]).await.unwrap();

    let (a, b) = tokio::join!(
        db.mark_question_as_viewed(q, alice),
        db.mark_question_as_viewed(q, bob),
    );
    assert!(a.unwrap());
    assert!(b.unwrap());

    let (ua, ub) = tokio::join!(
        db.get_unused_question("tech", alice),
        db.get_unused_question("tech", bob),
    );
    assert!(ua.unwrap().is_none());
    assert!(ub.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolvers_see_one_winner() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(file_db(&dir).await);

    for round in 0..10 {
        let id = db
            .save_question(&format!("Will round {round} settle?"), "misc", ["s"])
            .await
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|caller| {
                let db = Arc::clone(&db);
                tokio::spawn(async move {
                    db.resolve_question(id, caller % 2 == 0, Some("race"))
                        .await
                })
            })
            .collect();

        let mut resolved = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(Some(_)) => resolved += 1,
                Err(DatabaseError::AlreadyResolved { question_id }) => {
                    assert_eq!(question_id, id);
                    rejected += 1;
                }
                other => panic!("round {round}: unexpected result {other:?}"),
            }
        }
        assert_eq!((resolved, rejected), (1, 7), "round {round}");

        let q = db.get_question(id).await.unwrap().unwrap();
        assert!(q.is_resolved());
    }
    assert!(db.get_pending_resolutions().await.unwrap().is_empty());
}

#[tokio::test]
async fn file_data_visible_to_second_handle() {
    let dir = TempDir::new().unwrap();
    let writer = file_db(&dir).await;
    let reader = file_db(&dir).await;

    let user = writer.create_user("gina", ["news"]).await.unwrap();
    let q = writer
        .save_question("Will the paper endorse?", "news", ["n"])
        .await
        .unwrap();
    writer.mark_question_as_viewed(q, user).await.unwrap();

    let history = reader.get_user_question_history(user, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question.id, q);
}
