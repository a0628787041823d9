//! Error types for `HerbTrace` core library.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using `HerbTrace` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `HerbTrace` operations.
///
/// Submission failures of either kind share the `Database operation failed`
/// prefix, so callers showing `to_string()` to a user get one flat message.
#[derive(Debug, Error)]
pub enum Error {
    /// Submission rejected before reaching the store
    #[error("Database operation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Object store rejected or failed a write
    #[error("Database operation failed: {0}")]
    Store(#[from] StoreError),

    /// Listing failed while looking up a single record
    #[error("Failed to retrieve herb data")]
    Retrieval(#[source] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a herb submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields absent or blank, in form order.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Quantity present but not a positive number.
    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),
}

impl ValidationError {
    /// Names of the missing fields, empty for other kinds.
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            Self::InvalidQuantity(_) => &[],
        }
    }
}
