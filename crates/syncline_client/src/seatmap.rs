//! Local read-through view of the shared seat pool.

use crate::sink::UpdateSink;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use syncline_protocol::{ClaimantId, SeatId, SeatStatus, SeatUpdate, UpdateItem, UpdatePayload};

/// One seat as last reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatState {
    /// The seat's status.
    pub status: SeatStatus,
    /// Who holds it, for held and booked seats.
    pub holder: Option<ClaimantId>,
}

/// The client's view of who holds what.
///
/// Mutation authority over the pool belongs exclusively to the server;
/// this map is only ever written from seat updates arriving through the
/// update feed, never from the outcome of a local claim attempt. Any
/// transition the server reports is accepted unconditionally, including a
/// server-driven release back to free.
#[derive(Debug, Default)]
pub struct SeatMap {
    seats: RwLock<BTreeMap<SeatId, SeatState>>,
}

impl SeatMap {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one seat transition from the update stream.
    pub fn apply(&self, update: &SeatUpdate) {
        self.seats.write().insert(
            update.seat,
            SeatState {
                status: update.status,
                holder: update.holder,
            },
        );
    }

    /// Returns the last reported state of a seat, if it has been observed.
    pub fn state(&self, seat: SeatId) -> Option<SeatState> {
        self.seats.read().get(&seat).copied()
    }

    /// Returns the last reported status of a seat.
    pub fn status(&self, seat: SeatId) -> Option<SeatStatus> {
        self.state(seat).map(|state| state.status)
    }

    /// Returns true if the seat was last reported free.
    ///
    /// An unobserved seat is not known to be free.
    pub fn is_free(&self, seat: SeatId) -> bool {
        matches!(self.status(seat), Some(SeatStatus::Free))
    }

    /// Returns every seat last reported held or booked by `claimant`.
    pub fn held_by(&self, claimant: ClaimantId) -> Vec<SeatId> {
        self.seats
            .read()
            .iter()
            .filter(|(_, state)| state.holder == Some(claimant))
            .map(|(seat, _)| *seat)
            .collect()
    }

    /// Returns every observed seat and its state, in seat order.
    pub fn snapshot(&self) -> Vec<(SeatId, SeatState)> {
        self.seats
            .read()
            .iter()
            .map(|(seat, state)| (*seat, *state))
            .collect()
    }

    /// Returns how many seats have been observed.
    pub fn len(&self) -> usize {
        self.seats.read().len()
    }

    /// Returns true if no seat has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.seats.read().is_empty()
    }
}

impl UpdateSink for SeatMap {
    fn render(&self, item: &UpdateItem) {
        if let UpdatePayload::Seat(update) = &item.payload {
            self.apply(update);
        }
    }
}
