//! Cancellation tokens.

use crate::error::{ClientError, ClientResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag that requests cancellation of in-flight work.
///
/// Cancellation is best-effort at the transport layer: an implementation
/// that cannot abort a request in flight may still complete it, and the
/// server may still process it. Consumers that need a binding guarantee
/// (the lookup arbitrator) must check their own guard at completion time
/// rather than rely on the token having taken effect.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns an error if cancellation has been requested.
    pub fn check(&self) -> ClientResult<()> {
        if self.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }
}
