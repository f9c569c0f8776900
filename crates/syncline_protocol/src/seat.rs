//! Seat reservation types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one seat in the shared pool.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SeatId(u32);

impl SeatId {
    /// Creates a seat id.
    pub fn new(number: u32) -> Self {
        SeatId(number)
    }

    /// Returns the seat number.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// A session-scoped identity representing one client's attempts to hold
/// seats.
///
/// Claimant ids are generated locally (a large random integer) and only
/// need to be unique in practice for the lifetime of one client session.
/// The server uses them to decide which holds belong to which client; it
/// never authenticates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimantId(u64);

impl ClaimantId {
    /// Creates a claimant id from its raw representation.
    pub fn new(raw: u64) -> Self {
        ClaimantId(raw)
    }

    /// Returns the raw representation.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClaimantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claimant {:016x}", self.0)
    }
}

/// The lifecycle state of one seat, as the server reports it.
///
/// Transitions are monotone per seat: `free → held → booked`. A
/// `held → free` transition is possible only as a server-defined release,
/// which clients accept unconditionally; no transition leaves `booked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Nobody holds the seat.
    Free,
    /// A claimant holds the seat but has not booked it.
    Held,
    /// The seat is booked; terminal.
    Booked,
}

impl SeatStatus {
    /// Returns true if the seat can be claimed.
    pub fn is_free(self) -> bool {
        matches!(self, SeatStatus::Free)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatStatus::Free => write!(f, "free"),
            SeatStatus::Held => write!(f, "held"),
            SeatStatus::Booked => write!(f, "booked"),
        }
    }
}

/// One seat transition delivered through the update stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatUpdate {
    /// The seat that changed.
    pub seat: SeatId,
    /// Its new status.
    pub status: SeatStatus,
    /// Who holds it, for `held` and `booked` seats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<ClaimantId>,
}

impl SeatUpdate {
    /// A seat becoming (or starting out) free.
    pub fn free(seat: SeatId) -> Self {
        Self {
            seat,
            status: SeatStatus::Free,
            holder: None,
        }
    }

    /// A seat held by `claimant`.
    pub fn held(seat: SeatId, claimant: ClaimantId) -> Self {
        Self {
            seat,
            status: SeatStatus::Held,
            holder: Some(claimant),
        }
    }

    /// A seat booked by `claimant`.
    pub fn booked(seat: SeatId, claimant: ClaimantId) -> Self {
        Self {
            seat,
            status: SeatStatus::Booked,
            holder: Some(claimant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_status_predicate() {
        assert!(SeatStatus::Free.is_free());
        assert!(!SeatStatus::Held.is_free());
        assert!(!SeatStatus::Booked.is_free());
    }

    #[test]
    fn seat_update_json_shape() {
        let update = SeatUpdate::held(SeatId::new(7), ClaimantId::new(99));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["seat"], 7);
        assert_eq!(json["status"], "held");
        assert_eq!(json["holder"], 99);

        // holder is omitted, not null, for free seats
        let json = serde_json::to_value(SeatUpdate::free(SeatId::new(3))).unwrap();
        assert!(json.get("holder").is_none());
    }
}
