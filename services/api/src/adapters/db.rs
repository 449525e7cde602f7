//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `EntryStore`, `TemporalQueries` and `AuthStore` ports from the `core`
//! crate. It handles all interactions with the SQLite database using `sqlx`.
//!
//! Every statement acquires a connection from the pool for its own duration;
//! nothing holds a connection across unrelated requests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use journal_core::dates::{day_bounds, entry_day, month_bounds};
use journal_core::domain::{
    EntryDetail, EntrySummary, MoodPoint, NewEntry, User, UserCredentials, NEUTRAL_MOOD_RATING,
};
use journal_core::ports::{AuthStore, EntryStore, PortError, PortResult, TemporalQueries};
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeSet;

/// The one owner filter every single-entry lookup and mutation goes through.
/// Keeping it in a single fragment means no new query can forget it.
const OWNED_ENTRY_PREDICATE: &str = "id = ? AND owner_username = ?";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the journal storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The owner-scoped fetch primitive behind `get_entry`. Returns `None`
    /// both when the row is absent and when it belongs to someone else.
    async fn fetch_owned(&self, owner: &str, entry_id: i64) -> PortResult<Option<EntryRecord>> {
        let sql = format!(
            "SELECT id, owner_username, title, content, mood, mood_rating, created_at \
             FROM journal WHERE {OWNED_ENTRY_PREDICATE}"
        );
        sqlx::query_as::<_, EntryRecord>(&sql)
            .bind(entry_id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct EntryRecord {
    id: i64,
    owner_username: String,
    title: String,
    content: String,
    mood: Option<String>,
    mood_rating: Option<f64>,
    created_at: DateTime<Utc>,
}
impl EntryRecord {
    fn to_domain(self) -> EntryDetail {
        EntryDetail {
            id: self.id,
            owner_username: self.owner_username,
            title: self.title,
            content: self.content,
            mood: self.mood,
            mood_rating: self.mood_rating,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct EntrySummaryRecord {
    id: i64,
    title: String,
    mood: Option<String>,
    mood_rating: Option<f64>,
    created_at: DateTime<Utc>,
}
impl EntrySummaryRecord {
    fn to_domain(self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            title: self.title,
            mood: self.mood,
            mood_rating: self.mood_rating,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    username: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    username: String,
    expires_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct MoodRecord {
    mood_rating: Option<f64>,
    created_at: DateTime<Utc>,
}
impl MoodRecord {
    fn to_domain(self) -> MoodPoint {
        MoodPoint {
            date: entry_day(self.created_at),
            rating: self.mood_rating.unwrap_or(NEUTRAL_MOOD_RATING),
        }
    }
}

//=========================================================================================
// `EntryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl EntryStore for DbAdapter {
    async fn create_entry(&self, owner: &str, entry: NewEntry) -> PortResult<i64> {
        entry.validate()?;

        let result = sqlx::query(
            "INSERT INTO journal (owner_username, title, content, mood, mood_rating, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(owner)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(&entry.mood)
        .bind(entry.mood_rating)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn list_entries(&self, owner: &str) -> PortResult<Vec<EntrySummary>> {
        let records = sqlx::query_as::<_, EntrySummaryRecord>(
            "SELECT id, title, mood, mood_rating, created_at FROM journal \
             WHERE owner_username = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_entries_on(&self, owner: &str, day: NaiveDate) -> PortResult<Vec<EntrySummary>> {
        let (start, end) = day_bounds(day);
        let records = sqlx::query_as::<_, EntrySummaryRecord>(
            "SELECT id, title, mood, mood_rating, created_at FROM journal \
             WHERE owner_username = ? AND created_at >= ? AND created_at < ? \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_entry(&self, owner: &str, entry_id: i64) -> PortResult<EntryDetail> {
        let record = self
            .fetch_owned(owner, entry_id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Entry {} not found", entry_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_entry(&self, owner: &str, entry_id: i64) -> PortResult<bool> {
        let sql = format!("DELETE FROM journal WHERE {OWNED_ENTRY_PREDICATE}");
        let result = sqlx::query(&sql)
            .bind(entry_id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

//=========================================================================================
// `TemporalQueries` Trait Implementation
//=========================================================================================

#[async_trait]
impl TemporalQueries for DbAdapter {
    async fn dates_with_entries(
        &self,
        owner: &str,
        year: i32,
        month: u32,
    ) -> PortResult<BTreeSet<NaiveDate>> {
        // An unreal month has no days, hence no entries.
        let Some((start, end)) = month_bounds(year, month) else {
            return Ok(BTreeSet::new());
        };

        let timestamps = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM journal \
             WHERE owner_username = ? AND created_at >= ? AND created_at < ?",
        )
        .bind(owner)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(timestamps.into_iter().map(entry_day).collect())
    }

    async fn recent_mood_series(&self, owner: &str, limit: u32) -> PortResult<Vec<MoodPoint>> {
        let records = sqlx::query_as::<_, MoodRecord>(
            "SELECT mood_rating, created_at FROM journal \
             WHERE owner_username = ? ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}

//=========================================================================================
// `AuthStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthStore for DbAdapter {
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PortError::Conflict(format!("Username '{}' is taken", username))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;

        Ok(User {
            username: username.to_string(),
        })
    }

    async fn get_credentials(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("User '{}' not found", username)))?;

        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, username, expires_at) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(username)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<String> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT username, expires_at FROM auth_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound("Auth session not found".to_string()))?;

        if record.expires_at <= Utc::now() {
            // An expired session will never validate again; drop the row so
            // the table does not accumulate stale sessions.
            self.delete_auth_session(session_id).await?;
            return Err(PortError::NotFound("Auth session expired".to_string()));
        }
        Ok(record.username)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
