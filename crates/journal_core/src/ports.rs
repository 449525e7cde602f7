//! crates/journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

use crate::domain::{
    EntryDetail, EntrySummary, MoodPoint, NewEntry, User, UserCredentials, ValidationError,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The row is absent, or belongs to someone other than the caller. The
    /// two cases are deliberately indistinguishable.
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    /// A uniqueness clash, e.g. a duplicate username at signup.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Owner-scoped persistence of journal entries.
///
/// Every operation takes the owner's username first, and an implementation
/// must scope every read and write to that owner. Nothing here authenticates;
/// callers pass an identity that has already been verified.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persists a new entry with a server-assigned id and creation timestamp.
    async fn create_entry(&self, owner: &str, entry: NewEntry) -> PortResult<i64>;

    /// All of the owner's entries, most recent first.
    async fn list_entries(&self, owner: &str) -> PortResult<Vec<EntrySummary>>;

    /// The owner's entries created on the given UTC calendar day, most recent first.
    async fn list_entries_on(&self, owner: &str, day: NaiveDate) -> PortResult<Vec<EntrySummary>>;

    /// The full entry, only if it exists and the owner matches.
    async fn get_entry(&self, owner: &str, entry_id: i64) -> PortResult<EntryDetail>;

    /// Deletes the entry if it exists and the owner matches; reports whether
    /// a row was removed. Deleting an absent id is a no-op, not an error.
    async fn delete_entry(&self, owner: &str, entry_id: i64) -> PortResult<bool>;
}

/// Day-granularity aggregations derived from entry timestamps.
#[async_trait]
pub trait TemporalQueries: Send + Sync {
    /// The distinct days within `year`/`month` on which the owner has at
    /// least one entry.
    async fn dates_with_entries(
        &self,
        owner: &str,
        year: i32,
        month: u32,
    ) -> PortResult<BTreeSet<NaiveDate>>;

    /// The `limit` most recent entries as (date, rating) pairs, most recent
    /// first. Entries without a stored rating get the neutral default.
    async fn recent_mood_series(&self, owner: &str, limit: u32) -> PortResult<Vec<MoodPoint>>;
}

/// User accounts and browser login sessions.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Creates a user; fails with [`PortError::Conflict`] when the username
    /// is taken, leaving no partial write behind.
    async fn create_user(&self, username: &str, password_hash: &str) -> PortResult<User>;

    async fn get_credentials(&self, username: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session id to its username, rejecting expired sessions.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<String>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

/// Everything the web layer needs from persistence, behind one object.
pub trait JournalStore: EntryStore + TemporalQueries + AuthStore {}

impl<T: EntryStore + TemporalQueries + AuthStore> JournalStore for T {}
