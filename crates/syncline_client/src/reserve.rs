//! Claim/commit coordination against the shared seat pool.

use crate::cancel::CancelToken;
use crate::error::ClientResult;
use crate::transport::Transport;
use std::sync::Arc;
use syncline_protocol::{ClaimantId, SeatId};

/// The server's answer to one hold attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The hold replaced a free (or absent) prior state; the seat is ours
    /// pending booking.
    Held(SeatId),
    /// Another claimant already holds the seat; surface a transient
    /// notice keyed by this seat.
    AlreadyHeld(SeatId),
}

/// Issues claim and commit operations and interprets the server's
/// authoritative verdict.
///
/// The coordinator never touches local seat state: a hold that the server
/// accepted still only becomes visible through the update feed, which is
/// the single source of truth shared by every concurrent client. Two
/// clients never share a connection, so only the pull-based cursor-ordered
/// channel can give them a consistent eventual view of each other's
/// claims.
pub struct SeatCoordinator<T: Transport> {
    transport: Arc<T>,
    claimant: ClaimantId,
}

impl<T: Transport> SeatCoordinator<T> {
    /// Creates a coordinator acting as `claimant`.
    pub fn new(transport: Arc<T>, claimant: ClaimantId) -> Self {
        Self { transport, claimant }
    }

    /// Returns the claimant identity this coordinator acts as.
    pub fn claimant(&self) -> ClaimantId {
        self.claimant
    }

    /// Requests exclusive hold of one seat.
    ///
    /// Rejection is not an error: the caller gets `AlreadyHeld` and must
    /// leave its local view untouched; only a later update from the feed
    /// may change it.
    pub fn hold(&self, seat: SeatId, cancel: &CancelToken) -> ClientResult<HoldOutcome> {
        let verdict = self.transport.hold(seat, self.claimant, cancel)?;
        if verdict.accepted {
            tracing::info!(seat = seat.number(), "hold accepted");
            Ok(HoldOutcome::Held(seat))
        } else {
            tracing::info!(seat = seat.number(), "hold rejected, already held");
            Ok(HoldOutcome::AlreadyHeld(seat))
        }
    }

    /// Requests finalization of every seat this claimant holds.
    ///
    /// Returns whether the server booked anything. Which seats changed is
    /// not part of the reply; the authoritative transitions arrive through
    /// the update feed.
    pub fn book(&self, cancel: &CancelToken) -> ClientResult<bool> {
        let verdict = self.transport.book(self.claimant, cancel)?;
        tracing::info!(accepted = verdict.accepted, "book verdict");
        Ok(verdict.accepted)
    }
}
