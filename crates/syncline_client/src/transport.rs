//! Transport layer abstraction.

use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use syncline_protocol::{ClaimantId, Cursor, Request, SeatId, UpdateBatch, Verdict};

/// A transport sends one operation to the backend and resolves with its
/// result or a transport failure.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, loopback to an in-process handler, mock for
/// testing). Every call receives a [`CancelToken`]; implementations should
/// abort the request when they can, and must honor the configured timeout.
/// Calls block; overlapping request lifetimes come from callers issuing
/// them on separate threads.
pub trait Transport: Send + Sync {
    /// Resets the backend's world state.
    fn init(&self, cancel: &CancelToken) -> ClientResult<String>;

    /// Posts a chat message.
    fn post(&self, text: &str, cancel: &CancelToken) -> ClientResult<String>;

    /// Fetches updates newer than `since`.
    fn updates(&self, since: Cursor, cancel: &CancelToken) -> ClientResult<UpdateBatch>;

    /// Looks up completions for a prefix.
    fn suggest(&self, prefix: &str, cancel: &CancelToken) -> ClientResult<Vec<String>>;

    /// Requests exclusive hold of one seat.
    fn hold(
        &self,
        seat: SeatId,
        claimant: ClaimantId,
        cancel: &CancelToken,
    ) -> ClientResult<Verdict>;

    /// Finalizes every seat currently held by `claimant`.
    fn book(&self, claimant: ClaimantId, cancel: &CancelToken) -> ClientResult<Verdict>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn init(&self, cancel: &CancelToken) -> ClientResult<String> {
        (**self).init(cancel)
    }

    fn post(&self, text: &str, cancel: &CancelToken) -> ClientResult<String> {
        (**self).post(text, cancel)
    }

    fn updates(&self, since: Cursor, cancel: &CancelToken) -> ClientResult<UpdateBatch> {
        (**self).updates(since, cancel)
    }

    fn suggest(&self, prefix: &str, cancel: &CancelToken) -> ClientResult<Vec<String>> {
        (**self).suggest(prefix, cancel)
    }

    fn hold(
        &self,
        seat: SeatId,
        claimant: ClaimantId,
        cancel: &CancelToken,
    ) -> ClientResult<Verdict> {
        (**self).hold(seat, claimant, cancel)
    }

    fn book(&self, claimant: ClaimantId, cancel: &CancelToken) -> ClientResult<Verdict> {
        (**self).book(claimant, cancel)
    }
}

/// A scriptable transport for tests.
///
/// Update batches and verdicts are consumed from queues in call order;
/// suggestions are stubbed per prefix so completions stay deterministic
/// even when lookups run on racing worker threads. Every issued request is
/// recorded for assertions about what went over the wire.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<Request>>,
    update_queue: Mutex<VecDeque<ClientResult<UpdateBatch>>>,
    default_updates: Mutex<Option<UpdateBatch>>,
    suggest_stubs: Mutex<HashMap<String, Vec<String>>>,
    hold_queue: Mutex<VecDeque<ClientResult<Verdict>>>,
    book_queue: Mutex<VecDeque<ClientResult<Verdict>>>,
}

impl MockTransport {
    /// Creates an empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one reply for the next `updates` call.
    pub fn queue_updates(&self, batch: UpdateBatch) {
        self.update_queue.lock().push_back(Ok(batch));
    }

    /// Queues an error for the next `updates` call.
    pub fn queue_updates_error(&self, error: ClientError) {
        self.update_queue.lock().push_back(Err(error));
    }

    /// Sets the batch returned when the `updates` queue is empty.
    pub fn set_default_updates(&self, batch: UpdateBatch) {
        *self.default_updates.lock() = Some(batch);
    }

    /// Stubs the suggestions returned for a prefix.
    pub fn stub_suggestions(&self, prefix: impl Into<String>, words: &[&str]) {
        self.suggest_stubs
            .lock()
            .insert(prefix.into(), words.iter().map(|w| w.to_string()).collect());
    }

    /// Queues one verdict for the next `hold` call.
    pub fn queue_hold(&self, verdict: Verdict) {
        self.hold_queue.lock().push_back(Ok(verdict));
    }

    /// Queues an error for the next `hold` call.
    pub fn queue_hold_error(&self, error: ClientError) {
        self.hold_queue.lock().push_back(Err(error));
    }

    /// Queues one verdict for the next `book` call.
    pub fn queue_book(&self, verdict: Verdict) {
        self.book_queue.lock().push_back(Ok(verdict));
    }

    /// Returns every request issued so far, in issue order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Returns the cursor of every `updates` request issued so far.
    pub fn update_cursors(&self) -> Vec<Cursor> {
        self.requests
            .lock()
            .iter()
            .filter_map(|request| match request {
                Request::Updates { since } => Some(*since),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: Request, cancel: &CancelToken) -> ClientResult<()> {
        cancel.check()?;
        self.requests.lock().push(request);
        Ok(())
    }
}

impl Transport for MockTransport {
    fn init(&self, cancel: &CancelToken) -> ClientResult<String> {
        self.record(Request::Init, cancel)?;
        Ok("reset".into())
    }

    fn post(&self, text: &str, cancel: &CancelToken) -> ClientResult<String> {
        self.record(Request::Post { text: text.into() }, cancel)?;
        Ok("posted".into())
    }

    fn updates(&self, since: Cursor, cancel: &CancelToken) -> ClientResult<UpdateBatch> {
        self.record(Request::Updates { since }, cancel)?;
        match self.update_queue.lock().pop_front() {
            Some(reply) => reply,
            None => self
                .default_updates
                .lock()
                .clone()
                .ok_or_else(|| ClientError::Protocol("no mock updates reply queued".into())),
        }
    }

    fn suggest(&self, prefix: &str, cancel: &CancelToken) -> ClientResult<Vec<String>> {
        self.record(
            Request::Suggest {
                prefix: prefix.into(),
            },
            cancel,
        )?;
        self.suggest_stubs
            .lock()
            .get(prefix)
            .cloned()
            .ok_or_else(|| ClientError::Protocol(format!("no suggestions stubbed for {prefix:?}")))
    }

    fn hold(
        &self,
        seat: SeatId,
        claimant: ClaimantId,
        cancel: &CancelToken,
    ) -> ClientResult<Verdict> {
        self.record(Request::Hold { seat, claimant }, cancel)?;
        self.hold_queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Protocol("no mock hold verdict queued".into())))
    }

    fn book(&self, claimant: ClaimantId, cancel: &CancelToken) -> ClientResult<Verdict> {
        self.record(Request::Book { claimant }, cancel)?;
        self.book_queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Protocol("no mock book verdict queued".into())))
    }
}
