//! Client error types
//!
//! [`ClientError`] covers everything the backend or transport can return.
//! [`BookingError`] is what the workflows surface to the user: either a
//! local [`ValidationError`] (the backend was never called) or a backend
//! failure.

use thiserror::Error;

/// Transport / backend error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error returned by the data service
    #[error("API error {code}: {message}")]
    Api {
        code: String,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by the backend as invalid
    #[error("Validation error: {0}")]
    Validation(String),

    /// Client misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Local form validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No signed-in user, or date / start / end not chosen
    #[error("missing information")]
    MissingInformation,

    /// Start slot is not strictly before the end slot
    #[error("end time must be after start time")]
    InvalidTimeRange,

    /// Date is today or earlier
    #[error("date is in the past")]
    DateInPast,

    /// Date lies before the earliest accepted calendar date
    #[error("date is out of range")]
    DateOutOfRange,

    /// Wall-clock time skipped by a daylight-saving change
    #[error("local time does not exist")]
    NonexistentTime,

    /// Value is not one of the offered slots
    #[error("unknown time slot: {0}")]
    UnknownSlot(String),
}

impl ValidationError {
    /// Notification title
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingInformation => "Missing Information",
            Self::InvalidTimeRange => "Invalid Time Range",
            Self::DateInPast | Self::DateOutOfRange => "Invalid Date",
            Self::UnknownSlot(_) | Self::NonexistentTime => "Invalid Time",
        }
    }

    /// Notification description
    pub fn description(&self) -> String {
        match self {
            Self::MissingInformation => "Please fill in all required fields.".into(),
            Self::InvalidTimeRange => "End time must be after start time.".into(),
            Self::DateInPast => "Please choose a date after today.".into(),
            Self::DateOutOfRange => "Please choose a date on or after January 1, 1900.".into(),
            Self::NonexistentTime => "That time does not exist on the chosen date.".into(),
            Self::UnknownSlot(value) => {
                format!("{value} is not an available time. Choose a slot between 8:00 AM and 6:00 PM.")
            }
        }
    }
}

/// Error surfaced by the booking workflows
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("backend error: {0}")]
    Backend(#[from] ClientError),
}

impl BookingError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for booking workflows
pub type BookingResult<T> = Result<T, BookingError>;
