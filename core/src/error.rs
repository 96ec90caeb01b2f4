//! Error types for the RNAcentral dictionary client.
//!
//! # Design
//! A service-reported error is kept apart from a bare HTTP failure: EBI
//! Search answers most rejected queries with a JSON body describing the
//! problem, and callers want that payload rather than a string. Anything
//! non-2xx without a JSON body lands in `Http` with the raw status and body.

use thiserror::Error as ThisError;

/// Errors returned by the client, the dictionary and its transports.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// Non-2xx status with a body that is not JSON.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Non-2xx status with a JSON error payload from the search service.
    #[error("service error (HTTP {status}): {payload}")]
    Service {
        status: u16,
        payload: serde_json::Value,
    },

    /// The response body could not be deserialized into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A configuration document could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}
