//! # Syncline Protocol
//!
//! Wire protocol types and JSON codecs for Syncline.
//!
//! This crate provides:
//! - `Request` for the operation envelope (`{"op": ...}`)
//! - `Reply` for the result/error envelope
//! - `Cursor` for opaque sync progress markers
//! - `UpdateItem` / `UpdateBatch` for the incremental update stream
//! - Seat reservation types (`SeatId`, `SeatStatus`, `ClaimantId`)
//!
//! This is a pure protocol crate with no I/O operations. All messages
//! travel as JSON over a single request/response endpoint; the backend is
//! stateless between requests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod error;
mod messages;
mod seat;
mod update;

pub use cursor::Cursor;
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{Reply, Request, Verdict};
pub use seat::{ClaimantId, SeatId, SeatStatus, SeatUpdate};
pub use update::{UpdateBatch, UpdateItem, UpdatePayload};
