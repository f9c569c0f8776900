//! Opaque sync progress markers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, monotonically non-decreasing progress marker.
///
/// A cursor bounds "everything already observed" on the server. Clients
/// never interpret the value; they only hand the most recently observed
/// cursor back to the server when asking for newer updates. A wall-clock
/// timestamp and a sequence number both satisfy the contract; the value
/// only needs to order observations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cursor(u64);

impl Cursor {
    /// The starting cursor: nothing observed yet.
    pub const ZERO: Cursor = Cursor(0);

    /// Creates a cursor from its raw representation.
    pub fn new(raw: u64) -> Self {
        Cursor(raw)
    }

    /// Returns the raw representation.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Cursor {
    fn from(raw: u64) -> Self {
        Cursor(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_ordering() {
        assert!(Cursor::new(10) > Cursor::ZERO);
        assert_eq!(Cursor::new(10).max(Cursor::new(15)), Cursor::new(15));
        assert_eq!(Cursor::new(15).max(Cursor::new(15)), Cursor::new(15));
    }

    #[test]
    fn cursor_serializes_as_bare_number() {
        let json = serde_json::to_string(&Cursor::new(42)).unwrap();
        assert_eq!(json, "42");

        let back: Cursor = serde_json::from_str("42").unwrap();
        assert_eq!(back, Cursor::new(42));
    }
}
