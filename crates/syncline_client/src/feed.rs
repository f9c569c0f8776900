//! The continuous update feed.

use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::sink::{ErrorSink, Lane, UpdateSink};
use crate::transport::Transport;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use syncline_protocol::Cursor;

/// The current state of the update feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Never started.
    Idle,
    /// Cycling.
    Running,
    /// Stopped by request; can be restarted.
    Stopped,
    /// Stopped by an error; can be restarted.
    Failed,
}

impl FeedState {
    /// Returns true if the feed can start (or restart) from this state.
    pub fn can_start(&self) -> bool {
        !matches!(self, FeedState::Running)
    }
}

/// Counters describing the feed's progress.
#[derive(Debug, Clone, Default)]
pub struct FeedStats {
    /// Completed fetch cycles.
    pub cycles: u64,
    /// Items handed to the renderer.
    pub items_rendered: u64,
    /// Message of the error that stopped the feed, if any.
    pub last_error: Option<String>,
}

/// A cancellable loop that continuously pulls incremental updates.
///
/// Each cycle fetches everything newer than the current cursor, hands the
/// items to the renderer in arrival order, advances the cursor, and
/// immediately starts the next cycle. Cadence is entirely
/// request/response-latency-driven; there is no polling interval. A
/// reported error stops the feed without retrying; restarting a stopped
/// feed is an explicit caller decision. The absence of retry is inherited
/// from the source design.
///
/// The cursor is owned exclusively by the feed and never moves backward,
/// even if a late or duplicate response arrives.
pub struct UpdateFeed<T: Transport> {
    transport: Arc<T>,
    renderer: Arc<dyn UpdateSink>,
    errors: Arc<dyn ErrorSink>,
    cursor: AtomicU64,
    state: RwLock<FeedState>,
    stats: RwLock<FeedStats>,
    cancel: Mutex<CancelToken>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Transport + 'static> UpdateFeed<T> {
    /// Creates a feed. It does nothing until started or driven manually.
    pub fn new(
        transport: Arc<T>,
        renderer: Arc<dyn UpdateSink>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            transport,
            renderer,
            errors,
            cursor: AtomicU64::new(Cursor::ZERO.raw()),
            state: RwLock::new(FeedState::Idle),
            stats: RwLock::new(FeedStats::default()),
            cancel: Mutex::new(CancelToken::new()),
            worker: Mutex::new(None),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> FeedState {
        *self.state.read()
    }

    /// Returns the current counters.
    pub fn stats(&self) -> FeedStats {
        self.stats.read().clone()
    }

    /// Returns the cursor the next cycle would use.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.cursor.load(Ordering::SeqCst))
    }

    /// Begins an unbounded sequence of fetch cycles on a worker thread.
    ///
    /// `initial` only ever advances the cursor; a restart never rewinds
    /// behind updates already observed.
    pub fn start(self: &Arc<Self>, initial: Cursor) -> ClientResult<()> {
        {
            let mut state = self.state.write();
            if !state.can_start() {
                return Err(ClientError::InvalidState {
                    from: format!("{:?}", *state),
                    to: "Running".into(),
                });
            }
            *state = FeedState::Running;
        }

        self.advance_cursor(initial);

        let token = CancelToken::new();
        *self.cancel.lock() = token.clone();

        let feed = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("syncline-feed".into())
            .spawn(move || feed.run(&token))
            .map_err(|e| {
                *self.state.write() = FeedState::Failed;
                ClientError::transport_fatal(format!("failed to spawn feed thread: {e}"))
            })?;
        *self.worker.lock() = Some(handle);

        tracing::debug!(cursor = %self.cursor(), "update feed started");
        Ok(())
    }

    /// Cancels the outstanding fetch and halts further cycles.
    ///
    /// Blocks until the worker thread has exited; no cycle is ever issued
    /// after `stop` returns.
    pub fn stop(&self) {
        self.cancel.lock().cancel();
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
        let mut state = self.state.write();
        if *state == FeedState::Running {
            *state = FeedState::Stopped;
        }
        tracing::debug!("update feed stopped");
    }

    /// Runs cycles until cancelled or an error stops the feed.
    fn run(&self, cancel: &CancelToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            match self.run_once(cancel) {
                Ok(_) => continue,
                Err(ClientError::Cancelled) => break,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        retryable = err.is_retryable(),
                        "update feed halted"
                    );
                    self.errors.report(Lane::Updates, &err.to_string());
                    self.stats.write().last_error = Some(err.to_string());
                    *self.state.write() = FeedState::Failed;
                    return;
                }
            }
        }
        let mut state = self.state.write();
        if *state == FeedState::Running {
            *state = FeedState::Stopped;
        }
    }

    /// Performs exactly one fetch cycle.
    ///
    /// An empty batch is a normal cycle, not termination: the cursor is
    /// unchanged and the caller (or the running loop) issues the next
    /// fetch immediately.
    pub fn run_once(&self, cancel: &CancelToken) -> ClientResult<usize> {
        let since = self.cursor();
        let batch = self.transport.updates(since, cancel)?;

        for item in &batch.items {
            self.renderer.render(item);
        }
        if let Some(max) = batch.max_cursor() {
            self.advance_cursor(max);
        }

        let count = batch.items.len();
        {
            let mut stats = self.stats.write();
            stats.cycles += 1;
            stats.items_rendered += count as u64;
        }
        tracing::debug!(since = %since, items = count, next = %self.cursor(), "update cycle");
        Ok(count)
    }

    /// Advances the cursor, refusing to move it backward.
    fn advance_cursor(&self, to: Cursor) {
        self.cursor.fetch_max(to.raw(), Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemoryErrors, MemoryRenderer};
    use crate::transport::MockTransport;
    use proptest::prelude::*;
    use syncline_protocol::{UpdateBatch, UpdateItem, UpdatePayload};

    fn message(cursor: u64, text: &str) -> UpdateItem {
        UpdateItem::new(
            Cursor::new(cursor),
            UpdatePayload::Message { text: text.into() },
        )
    }

    fn feed_over(
        transport: &Arc<MockTransport>,
    ) -> (Arc<UpdateFeed<MockTransport>>, Arc<MemoryRenderer>, Arc<MemoryErrors>) {
        let renderer = Arc::new(MemoryRenderer::new());
        let errors = Arc::new(MemoryErrors::new());
        let feed = Arc::new(UpdateFeed::new(
            Arc::clone(transport),
            Arc::clone(&renderer) as Arc<dyn UpdateSink>,
            Arc::clone(&errors) as Arc<dyn ErrorSink>,
        ));
        (feed, renderer, errors)
    }

    #[test]
    fn four_cycle_progression() {
        // Cycles observe cursors 10, 10, 15, 15 with batch sizes 2, 0, 1, 0;
        // issued cursors must be 0, 10, 10, 15 and exactly 3 items emitted.
        let transport = Arc::new(MockTransport::new());
        transport.queue_updates(UpdateBatch::new(
            vec![message(10, "a"), message(10, "b")],
            None,
        ));
        transport.queue_updates(UpdateBatch::empty(Cursor::new(10)));
        transport.queue_updates(UpdateBatch::new(vec![message(15, "c")], None));
        transport.queue_updates(UpdateBatch::empty(Cursor::new(15)));

        let (feed, renderer, _) = feed_over(&transport);
        let cancel = CancelToken::new();
        for _ in 0..4 {
            feed.run_once(&cancel).unwrap();
        }

        let issued = transport.update_cursors();
        assert_eq!(
            issued,
            vec![
                Cursor::ZERO,
                Cursor::new(10),
                Cursor::new(10),
                Cursor::new(15)
            ]
        );
        assert_eq!(renderer.len(), 3);
        assert_eq!(feed.stats().cycles, 4);
        assert_eq!(feed.stats().items_rendered, 3);
    }

    #[test]
    fn cursor_never_moves_backward() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_updates(UpdateBatch::empty(Cursor::new(10)));
        // A late/duplicate response reporting older progress.
        transport.queue_updates(UpdateBatch::new(vec![message(5, "stale")], Some(Cursor::new(5))));
        transport.queue_updates(UpdateBatch::empty(Cursor::new(10)));

        let (feed, _, _) = feed_over(&transport);
        let cancel = CancelToken::new();
        for _ in 0..3 {
            feed.run_once(&cancel).unwrap();
        }

        assert_eq!(
            transport.update_cursors(),
            vec![Cursor::ZERO, Cursor::new(10), Cursor::new(10)]
        );
        assert_eq!(feed.cursor(), Cursor::new(10));
    }

    #[test]
    fn empty_batch_is_not_termination() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_updates(UpdateBatch::empty(Cursor::new(4)));
        transport.queue_updates(UpdateBatch::empty(Cursor::new(4)));
        transport.queue_updates_error(ClientError::Server("boom".into()));

        let (feed, _, errors) = feed_over(&transport);
        feed.run(&CancelToken::new());

        // Both empty batches were followed by another cycle.
        assert_eq!(
            transport.update_cursors(),
            vec![Cursor::ZERO, Cursor::new(4), Cursor::new(4)]
        );
        assert_eq!(feed.state(), FeedState::Failed);
        assert_eq!(
            errors.last_for(Lane::Updates),
            Some("server error: boom".into())
        );
        assert_eq!(feed.stats().last_error, Some("server error: boom".into()));
    }

    #[test]
    fn error_stops_without_retry() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_updates_error(ClientError::transport_retryable("connection reset"));
        // A reply is available, but the feed must not come back for it.
        transport.queue_updates(UpdateBatch::empty(Cursor::new(9)));

        let (feed, _, errors) = feed_over(&transport);
        feed.run(&CancelToken::new());

        assert_eq!(transport.update_cursors().len(), 1);
        assert_eq!(feed.state(), FeedState::Failed);
        assert!(errors
            .last_for(Lane::Updates)
            .unwrap()
            .contains("connection reset"));
    }

    #[test]
    fn pre_cancelled_run_issues_nothing() {
        let transport = Arc::new(MockTransport::new());
        transport.set_default_updates(UpdateBatch::empty(Cursor::ZERO));

        let (feed, _, _) = feed_over(&transport);
        let cancel = CancelToken::new();
        cancel.cancel();
        feed.run(&cancel);

        assert!(transport.update_cursors().is_empty());
    }

    #[test]
    fn start_stop_lifecycle() {
        let transport = Arc::new(MockTransport::new());
        transport.set_default_updates(UpdateBatch::empty(Cursor::new(1)));

        let (feed, _, _) = feed_over(&transport);
        assert_eq!(feed.state(), FeedState::Idle);

        feed.start(Cursor::ZERO).unwrap();
        assert_eq!(feed.state(), FeedState::Running);

        // Starting a running feed is refused.
        assert!(matches!(
            feed.start(Cursor::ZERO),
            Err(ClientError::InvalidState { .. })
        ));

        // Wait for the loop to complete at least one cycle before stopping.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while feed.stats().cycles == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        feed.stop();
        assert_eq!(feed.state(), FeedState::Stopped);
        assert!(feed.stats().cycles > 0);

        // No cycle is issued after stop returns.
        let cycles = feed.stats().cycles;
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(feed.stats().cycles, cycles);

        // A stopped feed can be restarted and keeps its cursor.
        feed.start(Cursor::ZERO).unwrap();
        assert_eq!(feed.state(), FeedState::Running);
        assert_eq!(feed.cursor(), Cursor::new(1));
        feed.stop();
    }

    #[test]
    fn restart_initial_cursor_never_rewinds() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_updates(UpdateBatch::empty(Cursor::new(20)));

        let (feed, _, _) = feed_over(&transport);
        feed.run_once(&CancelToken::new()).unwrap();
        assert_eq!(feed.cursor(), Cursor::new(20));

        // Passing an older initial cursor on restart must not rewind.
        transport.set_default_updates(UpdateBatch::empty(Cursor::new(20)));
        feed.start(Cursor::new(3)).unwrap();
        assert_eq!(feed.cursor(), Cursor::new(20));
        feed.stop();
    }

    proptest! {
        #[test]
        fn issued_cursors_are_monotone(
            batches in proptest::collection::vec(
                (
                    proptest::collection::vec(0u64..100, 0..4),
                    proptest::option::of(0u64..100),
                ),
                0..12,
            )
        ) {
            let transport = Arc::new(MockTransport::new());
            for (item_cursors, next) in &batches {
                let items = item_cursors
                    .iter()
                    .map(|c| message(*c, "x"))
                    .collect::<Vec<_>>();
                transport.queue_updates(UpdateBatch::new(items, next.map(Cursor::new)));
            }

            let (feed, _, _) = feed_over(&transport);
            let cancel = CancelToken::new();
            for _ in 0..batches.len() {
                feed.run_once(&cancel).unwrap();
            }

            let issued = transport.update_cursors();
            for pair in issued.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }
    }
}
