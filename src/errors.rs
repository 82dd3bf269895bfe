//! Unified error types for the records store.
//!
//! Storage and configuration failures are fatal. Everything else describes a
//! condition the caller can report back to the user (duplicate names, missing
//! records on write, malformed form values, restricted deletes).

use sea_orm::DbErr;
use thiserror::Error;

/// Errors produced by the records store
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Underlying storage engine failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Integer did not fit the target column type
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),

    /// An event type with this name is already stored
    #[error("Event type '{name}' already exists")]
    DuplicateEventType {
        /// The rejected name
        name: String,
    },

    /// A write targeted an event that does not exist
    #[error("Event {id} not found")]
    EventNotFound {
        /// Requested event id
        id: i64,
    },

    /// A contribution referenced a volunteer that does not exist
    #[error("Volunteer {id} not found")]
    VolunteerNotFound {
        /// Requested volunteer id
        id: i64,
    },

    /// A required form field was not submitted
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Form field name
        field: String,
    },

    /// A form field could not be coerced to its column type
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField {
        /// Form field name
        field: String,
        /// The submitted text
        value: String,
    },

    /// A date was not in `YYYY-MM-DD` form
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The submitted text
        value: String,
    },

    /// A quarter label was not in `YYYYQn` form
    #[error("Invalid quarter '{value}', expected a label like 2024Q1")]
    InvalidQuarter {
        /// The submitted text
        value: String,
    },

    /// Delete rejected because events still reference the record
    #[error("{entity} {id} is still referenced by {count} event(s)")]
    ReferenceInUse {
        /// Kind of record being deleted
        entity: &'static str,
        /// Its id
        id: i64,
        /// Number of events pointing at it
        count: u64,
    },
}

impl Error {
    /// Whether the error describes a user-facing condition rather than a
    /// storage or configuration failure.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::IntConversion(_)
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
