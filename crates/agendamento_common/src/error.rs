// --- File: crates/agendamento_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error type shared by every Agendamento crate.
///
/// Transport, status and parse failures are what the widget collapses into
/// its generic "try again" feedback; the remaining variants surface while
/// wiring the widget up.
#[derive(Error, Debug)]
pub enum BookingError {
    /// The request never produced a response (connection refused, DNS, timeout...)
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The backend answered with a non-success status
    #[error("Unexpected HTTP status {status} from {url}")]
    StatusError { status: u16, url: String },

    /// The response body was not the JSON we expected
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A URL could not be built from the configured base and path
    #[error("Invalid URL: {0}")]
    UrlError(String),

    /// The page does not provide an element the widget binds to
    #[error("Missing page element: #{0}")]
    MissingElement(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BookingError {
    /// True for failures of the request/response cycle itself, as opposed to
    /// wiring problems on our side.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BookingError::HttpError(_)
                | BookingError::StatusError { .. }
                | BookingError::ParseError(_)
        )
    }
}

// Common error conversions
impl From<reqwest::Error> for BookingError {
    fn from(err: reqwest::Error) -> Self {
        if let (true, Some(status)) = (err.is_status(), err.status()) {
            return BookingError::StatusError {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if err.is_decode() {
            return BookingError::ParseError(err.to_string());
        }
        BookingError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for BookingError {
    fn from(err: config::ConfigError) -> Self {
        BookingError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn missing_element<T: fmt::Display>(id: T) -> BookingError {
    BookingError::MissingElement(id.to_string())
}
