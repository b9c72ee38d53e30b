//! Error types for the request gateway.
//!
//! # Design
//! A non-2xx status and an undecodable body are different failures and stay
//! different variants: `Http` means the server said no, `Decode` means it
//! said yes in a shape we could not read. Neither is retried or wrapped.

use thiserror::Error;

/// Errors returned by `Gateway` and `EventsApi` calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a status outside 200..=299.
    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },

    /// A successful response body was not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Status code carried by `Http`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
