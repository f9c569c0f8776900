//! Configuration for a client session.

use std::time::Duration;
use syncline_protocol::{ClaimantId, Cursor};

/// Configuration for one client session.
///
/// The original front-ends kept this as ambient module state loaded from a
/// `config.json`; here it is an explicit value owned by the session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend endpoint accepting the operation envelope.
    pub endpoint: String,
    /// Per-request timeout handed to the transport.
    pub timeout: Duration,
    /// Cursor the update feed starts from.
    pub initial_cursor: Cursor,
    /// Claimant identity; generated at session construction when absent.
    pub claimant: Option<ClaimantId>,
}

impl ClientConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            initial_cursor: Cursor::ZERO,
            claimant: None,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the cursor the update feed starts from.
    pub fn with_initial_cursor(mut self, cursor: Cursor) -> Self {
        self.initial_cursor = cursor;
        self
    }

    /// Pins the claimant identity instead of generating one.
    pub fn with_claimant(mut self, claimant: ClaimantId) -> Self {
        self.claimant = Some(claimant);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = ClientConfig::new("http://localhost:8080/run")
            .with_timeout(Duration::from_secs(5))
            .with_initial_cursor(Cursor::new(7))
            .with_claimant(ClaimantId::new(42));

        assert_eq!(config.endpoint, "http://localhost:8080/run");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.initial_cursor, Cursor::new(7));
        assert_eq!(config.claimant, Some(ClaimantId::new(42)));
    }
}
