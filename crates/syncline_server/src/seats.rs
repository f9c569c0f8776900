//! The seat table: the single arbiter of hold/book contention.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use syncline_protocol::{ClaimantId, SeatId, SeatStatus, SeatUpdate};

#[derive(Debug, Clone, Copy)]
struct SeatRecord {
    status: SeatStatus,
    holder: Option<ClaimantId>,
}

/// The server's decision on one hold request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldDecision {
    /// The seat was free; it is now held by the requesting claimant.
    Accepted(SeatUpdate),
    /// The seat is held or booked by someone; state is unchanged.
    Rejected,
    /// The seat number does not exist.
    UnknownSeat,
}

/// Authoritative seat state.
///
/// Every mutation happens under one lock, so two clients racing for the
/// same seat always get one accept and one reject, never two accepts.
#[derive(Debug, Default)]
pub struct SeatTable {
    seats: RwLock<BTreeMap<SeatId, SeatRecord>>,
}

impl SeatTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pool with `count` free seats numbered from 1.
    ///
    /// Returns the transitions to publish.
    pub fn seed(&self, count: u32) -> Vec<SeatUpdate> {
        let mut seats = self.seats.write();
        seats.clear();
        (1..=count)
            .map(|number| {
                let seat = SeatId::new(number);
                seats.insert(
                    seat,
                    SeatRecord {
                        status: SeatStatus::Free,
                        holder: None,
                    },
                );
                SeatUpdate::free(seat)
            })
            .collect()
    }

    /// Decides one hold request.
    ///
    /// "Is this seat free" is an explicit status comparison; anything but
    /// a currently-free seat is a rejection, not a replacement.
    pub fn hold(&self, seat: SeatId, claimant: ClaimantId) -> HoldDecision {
        let mut seats = self.seats.write();
        match seats.get_mut(&seat) {
            None => HoldDecision::UnknownSeat,
            Some(record) if record.status.is_free() => {
                *record = SeatRecord {
                    status: SeatStatus::Held,
                    holder: Some(claimant),
                };
                HoldDecision::Accepted(SeatUpdate::held(seat, claimant))
            }
            Some(_) => HoldDecision::Rejected,
        }
    }

    /// Books every seat currently held by `claimant`.
    ///
    /// Returns the transitions to publish; empty when the claimant holds
    /// nothing.
    pub fn book(&self, claimant: ClaimantId) -> Vec<SeatUpdate> {
        let mut seats = self.seats.write();
        let mut booked = Vec::new();
        for (seat, record) in seats.iter_mut() {
            if record.status == SeatStatus::Held && record.holder == Some(claimant) {
                record.status = SeatStatus::Booked;
                booked.push(SeatUpdate::booked(*seat, claimant));
            }
        }
        booked
    }

    /// Releases a held seat back to free, as a server-defined transition
    /// (e.g. a hold expiring). Booked seats are never released.
    ///
    /// Returns the transition to publish, if the seat was held.
    pub fn release(&self, seat: SeatId) -> Option<SeatUpdate> {
        let mut seats = self.seats.write();
        let record = seats.get_mut(&seat)?;
        if record.status != SeatStatus::Held {
            return None;
        }
        *record = SeatRecord {
            status: SeatStatus::Free,
            holder: None,
        };
        Some(SeatUpdate::free(seat))
    }

    /// Returns the status of a seat.
    pub fn status(&self, seat: SeatId) -> Option<SeatStatus> {
        self.seats.read().get(&seat).map(|record| record.status)
    }

    /// Returns true if the seat exists and is free.
    pub fn is_free(&self, seat: SeatId) -> bool {
        matches!(self.status(seat), Some(SeatStatus::Free))
    }

    /// Returns the current state of every seat, in seat order.
    pub fn snapshot(&self) -> Vec<SeatUpdate> {
        self.seats
            .read()
            .iter()
            .map(|(seat, record)| SeatUpdate {
                seat: *seat,
                status: record.status,
                holder: record.holder,
            })
            .collect()
    }
}
