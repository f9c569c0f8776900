//! Incremental update stream types.

use crate::cursor::Cursor;
use crate::seat::SeatUpdate;
use serde::{Deserialize, Serialize};

/// The application payload carried by one update item.
///
/// Each demo surface has its own row shape; the sync core treats them all
/// identically and hands them to the renderer in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UpdatePayload {
    /// A chat message.
    Message {
        /// Message text.
        text: String,
    },
    /// A seat transition.
    Seat(SeatUpdate),
    /// A stock quote observation.
    Quote {
        /// Ticker symbol.
        symbol: String,
        /// Last observed price.
        price: f64,
    },
}

/// A value observed once through the update stream.
///
/// Created by the server, observed by the update feed, handed to the
/// renderer, then discarded; the feed retains no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    /// The cursor this item was produced at.
    pub cursor: Cursor,
    /// The application payload.
    pub payload: UpdatePayload,
}

impl UpdateItem {
    /// Creates an update item.
    pub fn new(cursor: Cursor, payload: UpdatePayload) -> Self {
        Self { cursor, payload }
    }
}

/// One batch of updates returned by the `updates` operation.
///
/// The server may report progress either as a single batch-level `next`
/// cursor, or implicitly through the per-item cursors, or both. Consumers
/// must take the maximum over everything present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBatch {
    /// Items newer than the requested cursor, in commit order.
    pub items: Vec<UpdateItem>,
    /// Batch-level next cursor, when the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Cursor>,
}

impl UpdateBatch {
    /// Creates a batch.
    pub fn new(items: Vec<UpdateItem>, next: Option<Cursor>) -> Self {
        Self { items, next }
    }

    /// Creates an empty batch carrying only a next cursor.
    pub fn empty(next: Cursor) -> Self {
        Self {
            items: Vec::new(),
            next: Some(next),
        }
    }

    /// The highest cursor present anywhere in this batch, if any.
    ///
    /// Returns `None` for an empty batch with no batch-level cursor; the
    /// consumer's cursor is unchanged in that case.
    pub fn max_cursor(&self) -> Option<Cursor> {
        let item_max = self.items.iter().map(|item| item.cursor).max();
        match (self.next, item_max) {
            (Some(next), Some(items)) => Some(next.max(items)),
            (Some(next), None) => Some(next),
            (None, some) => some,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::{ClaimantId, SeatId};

    fn message(cursor: u64, text: &str) -> UpdateItem {
        UpdateItem::new(
            Cursor::new(cursor),
            UpdatePayload::Message { text: text.into() },
        )
    }

    #[test]
    fn max_cursor_over_items_and_next() {
        let batch = UpdateBatch::new(vec![message(4, "a"), message(9, "b")], Some(Cursor::new(7)));
        assert_eq!(batch.max_cursor(), Some(Cursor::new(9)));

        let batch = UpdateBatch::new(vec![message(4, "a")], Some(Cursor::new(12)));
        assert_eq!(batch.max_cursor(), Some(Cursor::new(12)));

        let batch = UpdateBatch::new(vec![], None);
        assert_eq!(batch.max_cursor(), None);

        let batch = UpdateBatch::empty(Cursor::new(3));
        assert_eq!(batch.max_cursor(), Some(Cursor::new(3)));
    }

    #[test]
    fn payload_tags() {
        let item = message(1, "hello");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["payload"]["kind"], "message");
        assert_eq!(json["payload"]["text"], "hello");

        let seat = UpdateItem::new(
            Cursor::new(2),
            UpdatePayload::Seat(SeatUpdate::held(SeatId::new(7), ClaimantId::new(1))),
        );
        let json = serde_json::to_value(&seat).unwrap();
        assert_eq!(json["payload"]["kind"], "seat");
        assert_eq!(json["payload"]["seat"], 7);
    }
}
