//! # Syncline Client
//!
//! Client-side synchronization and arbitration core for stateless
//! request/response backends.
//!
//! This crate provides:
//! - Update feed: a cancellable loop that continuously pulls incremental
//!   updates using an opaque progress cursor
//! - Lookup arbitrator: generation-tagged lookups where only the response
//!   to the latest user input is ever applied
//! - Seat coordinator: claim/commit against a shared seat pool with the
//!   server as the only arbiter
//! - Transport abstraction with cancellation tokens and a loopback
//!   implementation for tests
//!
//! ## Architecture
//!
//! A [`ClientSession`] owns three independent lanes: the update feed, the
//! lookup arbitrator, and the seat coordinator. The lanes share no mutable
//! state with each other; shared state (who holds which seat) is mutated
//! only by the server and observed by every client through its own update
//! feed.
//!
//! ## Key invariants
//!
//! - The feed cursor never moves backward
//! - Feed cycle *N+1* is never issued before cycle *N* completes
//! - A lookup response is applied only if its generation is still current
//!   at completion time
//! - A seat is never marked held locally without server confirmation

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod arbitrate;
mod cancel;
mod config;
mod error;
mod feed;
mod http;
mod identity;
mod reserve;
mod seatmap;
mod session;
mod sink;
mod transport;

pub use arbitrate::{trailing_word, LookupArbitrator};
pub use cancel::CancelToken;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use feed::{FeedState, FeedStats, UpdateFeed};
pub use http::{HttpClient, HttpTransport, LoopbackClient, LoopbackHandler};
pub use identity::generate_claimant_id;
pub use reserve::{HoldOutcome, SeatCoordinator};
pub use seatmap::{SeatMap, SeatState};
pub use session::ClientSession;
pub use sink::{
    ErrorSink, Lane, MemoryErrors, MemoryRenderer, MemorySuggestions, SuggestionSink, UpdateSink,
};
pub use transport::{MockTransport, Transport};
