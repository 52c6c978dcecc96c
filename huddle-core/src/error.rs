//! Errors raised while decoding inbound frames

use thiserror::Error;

/// A frame that could not be turned into a [`SignalMessage`](crate::SignalMessage).
///
/// Always recoverable: the connection that sent it keeps reading.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed JSON or a missing `type` tag
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A known message type without one of its required fields
    #[error("`{kind}` message is missing `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}
