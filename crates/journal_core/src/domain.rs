//! crates/journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};

/// Maximum length of an entry title, in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum length of a username, in characters.
pub const USERNAME_MAX_CHARS: usize = 20;
/// The rating substituted at read time when an entry has no stored rating.
pub const NEUTRAL_MOOD_RATING: f64 = 5.0;

/// A rejected input field. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {TITLE_MAX_CHARS} characters")]
    TitleTooLong,
    #[error("content must not be empty")]
    EmptyContent,
    #[error("username must be 1 to {USERNAME_MAX_CHARS} characters")]
    InvalidUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

// Represents a user - used throughout the app
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub username: String,
    pub password_hash: String,
}

/// The fields a caller supplies when creating an entry. The id and the
/// creation timestamp are always server-assigned.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
}

impl NewEntry {
    /// Checks the required fields. Titles are bounded; content is not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// The reduced projection of an entry used in list views.
#[derive(Debug, Clone)]
pub struct EntrySummary {
    pub id: i64,
    pub title: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// The full projection of an entry used in single-entry views.
#[derive(Debug, Clone)]
pub struct EntryDetail {
    pub id: i64,
    pub owner_username: String,
    pub title: String,
    pub content: String,
    pub mood: Option<String>,
    pub mood_rating: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// One point of the recent-mood series: the entry's creation date paired
/// with its rating (or [`NEUTRAL_MOOD_RATING`] when none was stored).
#[derive(Debug, Clone, PartialEq)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub rating: f64,
}

/// Checks a username at signup time.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_CHARS {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

/// Checks a password at signup time.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, content: &str) -> NewEntry {
        NewEntry {
            title: title.to_string(),
            content: content.to_string(),
            mood: None,
            mood_rating: None,
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert!(entry("A day", "It rained.").validate().is_ok());
    }

    #[test]
    fn empty_title_is_rejected() {
        assert_eq!(
            entry("", "It rained.").validate(),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(
            entry("   ", "It rained.").validate(),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn overlong_title_is_rejected() {
        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(
            entry(&long, "It rained.").validate(),
            Err(ValidationError::TitleTooLong)
        );
        let exact = "x".repeat(TITLE_MAX_CHARS);
        assert!(entry(&exact, "It rained.").validate().is_ok());
    }

    #[test]
    fn empty_content_is_rejected() {
        assert_eq!(
            entry("A day", "").validate(),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn username_bounds() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"x".repeat(USERNAME_MAX_CHARS)).is_ok());
        assert!(validate_username(&"x".repeat(USERNAME_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(validate_password("").is_err());
        assert!(validate_password("hunter2").is_ok());
    }
}
