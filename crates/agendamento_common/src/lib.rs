// --- File: crates/agendamento_common/src/lib.rs ---

pub mod error;   // Error handling
pub mod http;    // HTTP client and request markers
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{missing_element, BookingError};

// Re-export HTTP utilities for easier access
pub use http::{
    client::create_client,
    REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, log_error, log_result};
