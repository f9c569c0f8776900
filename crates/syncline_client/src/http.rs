//! HTTP transport implementation.
//!
//! The actual HTTP client is abstracted via a trait so different libraries
//! (reqwest, ureq, a WASM fetch shim) can supply it; the core only needs a
//! blocking POST with a timeout and a cancellation token. All operations
//! go to the single configured endpoint as a JSON envelope, mirroring the
//! backends this client talks to.

use crate::cancel::CancelToken;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use std::time::Duration;
use syncline_protocol::{ClaimantId, Cursor, Reply, Request, SeatId, UpdateBatch, Verdict};

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP layer. `post` must
/// block for at most `timeout` and should abort early when `cancel` fires;
/// an implementation that cannot abort may let the request run to
/// completion; the core suppresses the result itself.
pub trait HttpClient: Send + Sync {
    /// Sends a POST request with a JSON body and returns the response body.
    fn post(
        &self,
        url: &str,
        body: Vec<u8>,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, String>;
}

/// HTTP-based transport posting the JSON operation envelope to one
/// endpoint.
pub struct HttpTransport<C: HttpClient> {
    endpoint: String,
    timeout: Duration,
    client: C,
}

impl<C: HttpClient> HttpTransport<C> {
    /// Creates a transport for the given endpoint.
    pub fn new(endpoint: impl Into<String>, client: C) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            client,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn call<T: DeserializeOwned>(
        &self,
        request: &Request,
        cancel: &CancelToken,
    ) -> ClientResult<T> {
        cancel.check()?;
        let body = request.to_json()?;

        let raw = self
            .client
            .post(&self.endpoint, body, self.timeout, cancel)
            .map_err(|message| {
                if cancel.is_cancelled() {
                    ClientError::Cancelled
                } else {
                    ClientError::transport_retryable(message)
                }
            })?;

        // A response that raced a cancellation is suppressed, not applied.
        cancel.check()?;

        let reply: Reply<T> = Reply::from_json(&raw)?;
        Ok(reply.into_result()?)
    }
}

impl<C: HttpClient> Transport for HttpTransport<C> {
    fn init(&self, cancel: &CancelToken) -> ClientResult<String> {
        self.call(&Request::Init, cancel)
    }

    fn post(&self, text: &str, cancel: &CancelToken) -> ClientResult<String> {
        self.call(&Request::Post { text: text.into() }, cancel)
    }

    fn updates(&self, since: Cursor, cancel: &CancelToken) -> ClientResult<UpdateBatch> {
        self.call(&Request::Updates { since }, cancel)
    }

    fn suggest(&self, prefix: &str, cancel: &CancelToken) -> ClientResult<Vec<String>> {
        self.call(
            &Request::Suggest {
                prefix: prefix.into(),
            },
            cancel,
        )
    }

    fn hold(
        &self,
        seat: SeatId,
        claimant: ClaimantId,
        cancel: &CancelToken,
    ) -> ClientResult<Verdict> {
        self.call(&Request::Hold { seat, claimant }, cancel)
    }

    fn book(&self, claimant: ClaimantId, cancel: &CancelToken) -> ClientResult<Verdict> {
        self.call(&Request::Book { claimant }, cancel)
    }
}

/// A handler that can answer loopback requests in process.
pub trait LoopbackHandler: Send + Sync {
    /// Handles one POSTed request body and returns the response body.
    fn handle(&self, body: &[u8]) -> Result<Vec<u8>, String>;
}

/// An HTTP client that routes requests directly to an in-process handler.
///
/// Useful for tests and demos without network overhead. An optional
/// simulated latency restores the request/response cadence a real network
/// would impose on the latency-driven update feed.
pub struct LoopbackClient<H: LoopbackHandler> {
    handler: H,
    latency: Option<Duration>,
}

impl<H: LoopbackHandler> LoopbackClient<H> {
    /// Creates a loopback client over the given handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            latency: None,
        }
    }

    /// Adds a simulated per-request latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

impl<H: LoopbackHandler> HttpClient for LoopbackClient<H> {
    fn post(
        &self,
        _url: &str,
        body: Vec<u8>,
        _timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, String> {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        if cancel.is_cancelled() {
            return Err("cancelled".into());
        }
        self.handler.handle(&body)
    }
}
