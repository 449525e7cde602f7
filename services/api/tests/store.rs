//! services/api/tests/store.rs
//!
//! Integration tests for the SQLite adapter, run against an in-memory
//! database. The pool is capped at one connection so every statement sees
//! the same memory database.

use api_lib::adapters::db::DbAdapter;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use journal_core::domain::{NewEntry, NEUTRAL_MOOD_RATING};
use journal_core::ports::{AuthStore, EntryStore, PortError, TemporalQueries};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn test_store() -> (DbAdapter, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    let adapter = DbAdapter::new(pool.clone());
    adapter.run_migrations().await.expect("migrations failed");
    (adapter, pool)
}

async fn seed_user(store: &DbAdapter, username: &str) {
    store
        .create_user(username, "not-a-real-hash")
        .await
        .expect("failed to seed user");
}

fn entry(title: &str) -> NewEntry {
    NewEntry {
        title: title.to_string(),
        content: format!("content of {title}"),
        mood: None,
        mood_rating: None,
    }
}

/// Inserts a row with an explicit timestamp, bypassing the server-assigned
/// clock so date-bucketing can be tested deterministically.
async fn insert_entry_at(pool: &SqlitePool, owner: &str, title: &str, ts: DateTime<Utc>) {
    sqlx::query(
        "INSERT INTO journal (owner_username, title, content, mood, mood_rating, created_at) \
         VALUES (?, ?, ?, NULL, NULL, ?)",
    )
    .bind(owner)
    .bind(title)
    .bind("backdated content")
    .bind(ts)
    .execute(pool)
    .await
    .expect("failed to insert backdated entry");
}

#[tokio::test]
async fn create_then_get_returns_what_was_submitted() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    let before = Utc::now();
    let id = store
        .create_entry(
            "alice",
            NewEntry {
                title: "First".to_string(),
                content: "A fine day.".to_string(),
                mood: Some("happy".to_string()),
                mood_rating: Some(8.5),
            },
        )
        .await
        .unwrap();

    let detail = store.get_entry("alice", id).await.unwrap();
    assert_eq!(detail.id, id);
    assert_eq!(detail.owner_username, "alice");
    assert_eq!(detail.title, "First");
    assert_eq!(detail.content, "A fine day.");
    assert_eq!(detail.mood.as_deref(), Some("happy"));
    assert_eq!(detail.mood_rating, Some(8.5));
    assert!(detail.created_at >= before && detail.created_at <= Utc::now());
}

#[tokio::test]
async fn create_rejects_missing_fields_without_writing() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    let err = store
        .create_entry("alice", entry(""))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Validation(_)));

    let err = store
        .create_entry(
            "alice",
            NewEntry {
                title: "ok".to_string(),
                content: String::new(),
                mood: None,
                mood_rating: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::Validation(_)));

    assert!(store.list_entries("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn users_never_see_each_others_entries() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;
    seed_user(&store, "bob").await;

    let alice_id = store.create_entry("alice", entry("hers")).await.unwrap();
    let bob_id = store.create_entry("bob", entry("his")).await.unwrap();

    let alice_list = store.list_entries("alice").await.unwrap();
    assert_eq!(alice_list.len(), 1);
    assert_eq!(alice_list[0].id, alice_id);

    // A foreign id looks exactly like a missing one.
    let err = store.get_entry("alice", bob_id).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));

    // And a cross-user delete is a no-op.
    assert!(!store.delete_entry("alice", bob_id).await.unwrap());
    assert!(store.get_entry("bob", bob_id).await.is_ok());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    let id = store.create_entry("alice", entry("gone soon")).await.unwrap();

    assert!(store.delete_entry("alice", id).await.unwrap());
    let err = store.get_entry("alice", id).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
    assert!(!store.delete_entry("alice", id).await.unwrap());
}

#[tokio::test]
async fn history_is_most_recent_first() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    let first = store.create_entry("alice", entry("one")).await.unwrap();
    let second = store.create_entry("alice", entry("two")).await.unwrap();
    let third = store.create_entry("alice", entry("three")).await.unwrap();

    let listed: Vec<i64> = store
        .list_entries("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, vec![third, second, first]);

    let mut sorted_desc = store.list_entries("alice").await.unwrap();
    sorted_desc.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let resorted: Vec<i64> = sorted_desc.into_iter().map(|s| s.id).collect();
    assert_eq!(listed, resorted);
}

#[tokio::test]
async fn empty_history_is_empty_not_an_error() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    assert!(store.list_entries("alice").await.unwrap().is_empty());
    let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert!(store.list_entries_on("alice", day).await.unwrap().is_empty());
    assert!(store
        .dates_with_entries("alice", 2024, 3)
        .await
        .unwrap()
        .is_empty());
    assert!(store.recent_mood_series("alice", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn dates_with_entries_marks_exactly_the_right_days() {
    let (store, pool) = test_store().await;
    seed_user(&store, "alice").await;
    seed_user(&store, "bob").await;

    let march_5 = Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap();
    let march_5_later = Utc.with_ymd_and_hms(2024, 3, 5, 22, 0, 0).unwrap();
    let march_7 = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
    let april_1 = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();

    insert_entry_at(&pool, "alice", "a", march_5).await;
    insert_entry_at(&pool, "alice", "b", march_5_later).await;
    insert_entry_at(&pool, "alice", "c", march_7).await;
    insert_entry_at(&pool, "alice", "d", april_1).await;
    // Bob's March entry must not mark Alice's calendar.
    insert_entry_at(&pool, "bob", "e", march_5).await;

    let marked = store.dates_with_entries("alice", 2024, 3).await.unwrap();
    let expected: Vec<NaiveDate> = vec![
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
    ];
    assert_eq!(marked.into_iter().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn day_filter_agrees_with_the_calendar_bucketing() {
    let (store, pool) = test_store().await;
    seed_user(&store, "alice").await;

    let march_5 = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
    let march_6 = Utc.with_ymd_and_hms(2024, 3, 6, 0, 0, 0).unwrap();
    insert_entry_at(&pool, "alice", "late on the 5th", march_5).await;
    insert_entry_at(&pool, "alice", "midnight on the 6th", march_6).await;

    let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let on_fifth = store.list_entries_on("alice", day).await.unwrap();
    assert_eq!(on_fifth.len(), 1);
    assert_eq!(on_fifth[0].title, "late on the 5th");

    let marked = store.dates_with_entries("alice", 2024, 3).await.unwrap();
    assert!(marked.contains(&day));
    assert!(marked.contains(&NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()));
}

#[tokio::test]
async fn mood_series_defaults_missing_ratings_and_respects_the_limit() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    store
        .create_entry(
            "alice",
            NewEntry {
                title: "unrated".to_string(),
                content: "meh".to_string(),
                mood: None,
                mood_rating: None,
            },
        )
        .await
        .unwrap();
    store
        .create_entry(
            "alice",
            NewEntry {
                title: "rated".to_string(),
                content: "great".to_string(),
                mood: Some("great".to_string()),
                mood_rating: Some(9.0),
            },
        )
        .await
        .unwrap();

    let series = store.recent_mood_series("alice", 10).await.unwrap();
    assert_eq!(series.len(), 2);
    // Most recent first: the rated entry was created last.
    assert_eq!(series[0].rating, 9.0);
    assert_eq!(series[1].rating, NEUTRAL_MOOD_RATING);

    let capped = store.recent_mood_series("alice", 1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].rating, 9.0);
}

#[tokio::test]
async fn duplicate_signup_conflicts_without_clobbering() {
    let (store, _pool) = test_store().await;

    store.create_user("alice", "hash-one").await.unwrap();
    let err = store.create_user("alice", "hash-two").await.unwrap_err();
    assert!(matches!(err, PortError::Conflict(_)));

    // The original credentials survive the failed signup.
    let creds = store.get_credentials("alice").await.unwrap();
    assert_eq!(creds.password_hash, "hash-one");
}

#[tokio::test]
async fn auth_sessions_round_trip_and_expire() {
    let (store, _pool) = test_store().await;
    seed_user(&store, "alice").await;

    store
        .create_auth_session("live-session", "alice", Utc::now() + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(
        store.validate_auth_session("live-session").await.unwrap(),
        "alice"
    );

    store
        .create_auth_session("stale-session", "alice", Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    assert!(store.validate_auth_session("stale-session").await.is_err());

    store.delete_auth_session("live-session").await.unwrap();
    assert!(store.validate_auth_session("live-session").await.is_err());

    assert!(store.validate_auth_session("never-existed").await.is_err());
}

#[tokio::test]
async fn rejected_expired_sessions_are_pruned() {
    let (store, pool) = test_store().await;
    seed_user(&store, "alice").await;

    store
        .create_auth_session("stale-session", "alice", Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    assert!(store.validate_auth_session("stale-session").await.is_err());

    // The rejection also removes the row, so stale sessions cannot pile up.
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM auth_sessions WHERE id = ?")
            .bind("stale-session")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}
