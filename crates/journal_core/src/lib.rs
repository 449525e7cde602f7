pub mod calendar;
pub mod dates;
pub mod domain;
pub mod ports;

pub use domain::{
    EntryDetail, EntrySummary, MoodPoint, NewEntry, User, UserCredentials, ValidationError,
};
pub use ports::{AuthStore, EntryStore, JournalStore, PortError, PortResult, TemporalQueries};
