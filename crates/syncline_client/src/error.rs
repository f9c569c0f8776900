//! Error types for the client core.

use syncline_protocol::ProtocolError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client core.
///
/// No lane's failure affects another lane: an error stops the lane it
/// occurred in and is surfaced through that lane's error path; the other
/// lanes keep running.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or transport failure, including timeouts.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether a caller restarting the lane can expect the next
        /// attempt to succeed.
        retryable: bool,
    },

    /// The server returned a well-formed error payload; carried verbatim.
    #[error("server error: {0}")]
    Server(String),

    /// The response did not match the expected shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The request was cancelled locally.
    #[error("request cancelled")]
    Cancelled,

    /// An operation was attempted in a state that does not allow it.
    #[error("invalid state transition from {from} to {to}")]
    InvalidState {
        /// Current state.
        from: String,
        /// Attempted operation or target state.
        to: String,
    },
}

impl ClientError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if restarting the lane may succeed.
    ///
    /// The update feed never retries on its own; this classification is
    /// for callers deciding whether to restart a stopped lane.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport { retryable, .. } => *retryable,
            ClientError::Server(_) => true,
            _ => false,
        }
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Server(message) => ClientError::Server(message),
            ProtocolError::Malformed(message) => ClientError::Protocol(message),
            ProtocolError::Json(err) => ClientError::Protocol(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ClientError::transport_retryable("connection reset").is_retryable());
        assert!(!ClientError::transport_fatal("bad endpoint").is_retryable());
        assert!(ClientError::Server("oops".into()).is_retryable());
        assert!(!ClientError::Cancelled.is_retryable());
        assert!(!ClientError::Protocol("garbage".into()).is_retryable());
    }

    #[test]
    fn protocol_error_mapping() {
        let err: ClientError = ProtocolError::Server("bad op".into()).into();
        assert!(matches!(err, ClientError::Server(message) if message == "bad op"));

        let err: ClientError = ProtocolError::Malformed("empty".into()).into();
        assert!(matches!(err, ClientError::Protocol(_)));
    }
}
