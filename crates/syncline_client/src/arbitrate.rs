//! Last-writer-wins arbitration for user-triggered lookups.

use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::sink::{ErrorSink, Lane, SuggestionSink};
use crate::transport::Transport;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Returns the word under the caret: everything after the last space.
///
/// The lookup operates on the word being typed, not the whole entry; an
/// entry ending in a space has no word under the caret, which clears the
/// surface.
pub fn trailing_word(input: &str) -> &str {
    input.rsplit(' ').next().unwrap_or("")
}

/// What an edit turned into.
enum EditAction {
    /// Token unchanged by value; nothing to do.
    Ignore,
    /// Surface cleared; any in-flight lookup is now stale.
    Clear,
    /// A lookup to issue.
    Lookup {
        generation: u64,
        token: String,
        cancel: CancelToken,
    },
}

struct ArbiterInner {
    last_token: Option<String>,
    inflight: Option<CancelToken>,
    workers: Vec<JoinHandle<()>>,
}

/// Decides when user edits become lookups and guarantees only the
/// response to the latest issued lookup is ever applied.
///
/// Two in-flight requests can complete in either order; the transport
/// gives no sequencing guarantee. Each issued lookup is tagged with a
/// strictly increasing generation number, and a completion is applied
/// only if its tag still equals the current generation *at completion
/// time*. Cancelling the superseded request is best-effort; the
/// generation check is the binding cancellation semantic.
pub struct LookupArbitrator<T: Transport> {
    transport: Arc<T>,
    suggestions: Arc<dyn SuggestionSink>,
    errors: Arc<dyn ErrorSink>,
    generation: AtomicU64,
    inner: Mutex<ArbiterInner>,
}

impl<T: Transport + 'static> LookupArbitrator<T> {
    /// Creates an arbitrator.
    pub fn new(
        transport: Arc<T>,
        suggestions: Arc<dyn SuggestionSink>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            transport,
            suggestions,
            errors,
            generation: AtomicU64::new(0),
            inner: Mutex::new(ArbiterInner {
                last_token: None,
                inflight: None,
                workers: Vec::new(),
            }),
        }
    }

    /// Reacts to the user-visible input changing.
    ///
    /// A token equal by value to the last queried one is a no-op. An empty
    /// token or one containing an apostrophe clears the surface. Anything
    /// else supersedes the in-flight lookup and issues a new one on a
    /// worker thread.
    pub fn on_edit(self: &Arc<Self>, token: &str) {
        match self.register_edit(token) {
            EditAction::Ignore | EditAction::Clear => {}
            EditAction::Lookup {
                generation,
                token,
                cancel,
            } => self.spawn_lookup(generation, token, cancel),
        }
    }

    /// Clears the suggestion surface and invalidates every outstanding
    /// lookup, e.g. after the user accepts a completion.
    ///
    /// Bumping the generation here is what keeps a late pre-reset
    /// completion from ever repopulating the surface.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut inner = self.inner.lock();
            inner.last_token = None;
            if let Some(previous) = inner.inflight.take() {
                previous.cancel();
            }
        }
        self.suggestions.clear();
    }

    /// Joins every worker thread spawned so far.
    ///
    /// Part of session teardown; also lets tests and demos wait for the
    /// arbitration to settle.
    pub fn quiesce(&self) {
        let workers = std::mem::take(&mut self.inner.lock().workers);
        for handle in workers {
            let _ = handle.join();
        }
    }

    /// The state transition for one edit, without I/O.
    fn register_edit(&self, token: &str) -> EditAction {
        if token.is_empty() || token.contains('\'') {
            self.reset();
            return EditAction::Clear;
        }

        let mut inner = self.inner.lock();
        if inner.last_token.as_deref() == Some(token) {
            return EditAction::Ignore;
        }
        inner.last_token = Some(token.to_string());

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = inner.inflight.take() {
            previous.cancel();
        }
        let cancel = CancelToken::new();
        inner.inflight = Some(cancel.clone());

        EditAction::Lookup {
            generation,
            token: token.to_string(),
            cancel,
        }
    }

    fn spawn_lookup(self: &Arc<Self>, generation: u64, token: String, cancel: CancelToken) {
        let arbiter = Arc::clone(self);
        let handle = std::thread::spawn(move || {
            let outcome = arbiter.transport.suggest(&token, &cancel);
            arbiter.finish(generation, outcome);
        });
        self.inner.lock().workers.push(handle);
    }

    /// Applies one completed lookup, checked against the current
    /// generation at completion time.
    fn finish(&self, generation: u64, outcome: ClientResult<Vec<String>>) {
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(generation, "discarding stale lookup");
            return;
        }
        match outcome {
            Ok(words) => self.suggestions.show(&words),
            // Advisory cancellation that still reported in while current;
            // the generation check above is the binding guard.
            Err(ClientError::Cancelled) => {}
            Err(err) => {
                self.errors.report(Lane::Lookup, &err.to_string());
                self.suggestions.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemoryErrors, MemorySuggestions};
    use crate::transport::MockTransport;

    fn arbitrator() -> (
        Arc<LookupArbitrator<MockTransport>>,
        Arc<MockTransport>,
        Arc<MemorySuggestions>,
        Arc<MemoryErrors>,
    ) {
        let transport = Arc::new(MockTransport::new());
        let suggestions = Arc::new(MemorySuggestions::new());
        let errors = Arc::new(MemoryErrors::new());
        let arbiter = Arc::new(LookupArbitrator::new(
            Arc::clone(&transport),
            Arc::clone(&suggestions) as Arc<dyn SuggestionSink>,
            Arc::clone(&errors) as Arc<dyn ErrorSink>,
        ));
        (arbiter, transport, suggestions, errors)
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn trailing_word_extraction() {
        assert_eq!(trailing_word("the quick ca"), "ca");
        assert_eq!(trailing_word("ca"), "ca");
        assert_eq!(trailing_word("the quick "), "");
        assert_eq!(trailing_word(""), "");
    }

    #[test]
    fn unchanged_token_is_ignored() {
        let (arbiter, _, _, _) = arbitrator();
        assert!(matches!(
            arbiter.register_edit("ca"),
            EditAction::Lookup { generation: 1, .. }
        ));
        assert!(matches!(arbiter.register_edit("ca"), EditAction::Ignore));
        assert!(matches!(
            arbiter.register_edit("cat"),
            EditAction::Lookup { generation: 2, .. }
        ));
    }

    #[test]
    fn newer_edit_cancels_previous_request() {
        let (arbiter, _, _, _) = arbitrator();
        let first = match arbiter.register_edit("c") {
            EditAction::Lookup { cancel, .. } => cancel,
            _ => panic!("expected lookup"),
        };
        assert!(!first.is_cancelled());
        arbiter.register_edit("ca");
        assert!(first.is_cancelled());
    }

    #[test]
    fn only_latest_generation_is_applied() {
        // Edits "c", "ca", "cat" all outstanding; completions arrive in
        // order cat, ca, c. Only "cat"'s suggestions may ever be shown.
        let (arbiter, _, suggestions, _) = arbitrator();

        let g1 = match arbiter.register_edit("c") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        let g2 = match arbiter.register_edit("ca") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        let g3 = match arbiter.register_edit("cat") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };

        arbiter.finish(g3, Ok(words(&["cat", "cattle"])));
        arbiter.finish(g2, Ok(words(&["ca-wrong"])));
        arbiter.finish(g1, Ok(words(&["c-wrong"])));

        assert_eq!(suggestions.current(), words(&["cat", "cattle"]));
        assert_eq!(suggestions.shown().len(), 1);
    }

    #[test]
    fn stale_completion_after_newer_edit_is_discarded_in_any_order() {
        let (arbiter, _, suggestions, _) = arbitrator();

        let g1 = match arbiter.register_edit("ca") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        let g2 = match arbiter.register_edit("cat") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };

        // Old completion first this time.
        arbiter.finish(g1, Ok(words(&["stale"])));
        assert!(suggestions.current().is_empty());
        arbiter.finish(g2, Ok(words(&["cat"])));
        assert_eq!(suggestions.current(), words(&["cat"]));
    }

    #[test]
    fn reset_clears_pending_races() {
        let (arbiter, _, suggestions, _) = arbitrator();

        let g = match arbiter.register_edit("ca") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        arbiter.reset();

        // The pre-reset completion arrives late; it must not repopulate.
        arbiter.finish(g, Ok(words(&["ca"])));
        assert!(suggestions.current().is_empty());
        assert!(suggestions.shown().is_empty());
    }

    #[test]
    fn empty_and_apostrophe_tokens_clear() {
        let (arbiter, _, suggestions, _) = arbitrator();
        suggestions.show(&words(&["old"]));

        assert!(matches!(arbiter.register_edit(""), EditAction::Clear));
        assert!(suggestions.current().is_empty());

        suggestions.show(&words(&["old"]));
        assert!(matches!(arbiter.register_edit("don't"), EditAction::Clear));
        assert!(suggestions.current().is_empty());
    }

    #[test]
    fn failed_current_lookup_reports_and_clears() {
        let (arbiter, _, suggestions, errors) = arbitrator();
        suggestions.show(&words(&["old"]));

        let g = match arbiter.register_edit("ca") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        arbiter.finish(g, Err(ClientError::transport_retryable("reset by peer")));

        assert!(suggestions.current().is_empty());
        assert!(errors.last_for(Lane::Lookup).unwrap().contains("reset by peer"));
    }

    #[test]
    fn failed_stale_lookup_is_silent() {
        let (arbiter, _, _, errors) = arbitrator();

        let g1 = match arbiter.register_edit("ca") {
            EditAction::Lookup { generation, .. } => generation,
            _ => panic!("expected lookup"),
        };
        arbiter.register_edit("cat");

        // A timed-out stale request is just another completion to check.
        arbiter.finish(g1, Err(ClientError::transport_retryable("timed out")));
        assert!(errors.last_for(Lane::Lookup).is_none());
    }

    #[test]
    fn threaded_edits_settle_on_latest_token() {
        let (arbiter, transport, suggestions, _) = arbitrator();
        transport.stub_suggestions("c", &["c-wrong"]);
        transport.stub_suggestions("ca", &["ca-wrong"]);
        transport.stub_suggestions("cat", &["cat", "cattle", "catalog"]);

        arbiter.on_edit("c");
        arbiter.on_edit("ca");
        arbiter.on_edit("cat");
        arbiter.quiesce();

        assert_eq!(suggestions.current(), words(&["cat", "cattle", "catalog"]));
    }
}
