//! # Syncline Server
//!
//! In-memory reference backend for the Syncline demo operations.
//!
//! This crate provides:
//! - An update log assigning monotone cursors to committed changes
//! - A seat table arbitrating hold/book contention
//! - A frequency-ranked suggestion index
//! - A request handler speaking the JSON operation envelope
//!
//! The production backend is an external collaborator; this server exists
//! so the client core can be exercised end-to-end in tests, demos, and
//! the CLI without a network. It is not a network server itself: expose
//! [`DemoServer::handle`] behind whatever HTTP shim or loopback transport
//! the caller prefers.
//!
//! # Key invariants
//!
//! - The server is the only arbiter of seat contention; clients learn the
//!   outcome of everyone's claims from the update log
//! - Cursors never repeat and never decrease, even across an `init` reset
//! - Every committed change is observable through `updates` exactly once
//!   per cursor position

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod handler;
mod log;
mod seats;
mod server;
mod words;

pub use config::ServerConfig;
pub use handler::RequestHandler;
pub use log::UpdateLog;
pub use seats::{HoldDecision, SeatTable};
pub use server::DemoServer;
pub use words::SuggestionIndex;
