//! Error types for protocol encoding and decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding, decoding, or interpreting
/// protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The server returned a well-formed error payload.
    #[error("server error: {0}")]
    Server(String),

    /// The reply did not match the expected envelope shape.
    #[error("malformed reply: {0}")]
    Malformed(String),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProtocolError::Server("bad op".into());
        assert_eq!(err.to_string(), "server error: bad op");

        let err = ProtocolError::Malformed("neither result nor error".into());
        assert!(err.to_string().starts_with("malformed reply"));
    }
}
