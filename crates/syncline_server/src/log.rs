//! The server-side update log.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use syncline_protocol::{Cursor, UpdateBatch, UpdateItem, UpdatePayload};

/// Committed changes in commit order, each stamped with a monotone cursor.
///
/// The cursor counter survives [`clear`](Self::clear): a client that
/// observed cursor N before an `init` reset must never be replayed older
/// positions, so reset clears the items but keeps counting.
#[derive(Debug, Default)]
pub struct UpdateLog {
    items: RwLock<Vec<UpdateItem>>,
    next_cursor: AtomicU64,
}

impl UpdateLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            next_cursor: AtomicU64::new(1),
        }
    }

    /// Appends one committed change and returns its cursor.
    pub fn append(&self, payload: UpdatePayload) -> Cursor {
        let cursor = Cursor::new(self.next_cursor.fetch_add(1, Ordering::SeqCst));
        self.items.write().push(UpdateItem::new(cursor, payload));
        cursor
    }

    /// Returns changes newer than `cursor`, at most `limit` of them.
    ///
    /// A full (untruncated) batch carries the log's latest cursor so an
    /// up-to-date client keeps cycling on an unchanged cursor. A truncated
    /// batch carries no batch-level cursor: the per-item cursors bound the
    /// client's progress to what it actually received.
    pub fn since(&self, cursor: Cursor, limit: usize) -> UpdateBatch {
        let all = self.items.read();
        let mut items = Vec::new();
        let mut truncated = false;
        for item in all.iter().filter(|item| item.cursor > cursor) {
            if items.len() < limit {
                items.push(item.clone());
            } else {
                truncated = true;
                break;
            }
        }
        if truncated {
            UpdateBatch::new(items, None)
        } else {
            UpdateBatch::new(items, Some(self.latest()))
        }
    }

    /// Returns the cursor of the most recently committed change.
    pub fn latest(&self) -> Cursor {
        Cursor::new(self.next_cursor.load(Ordering::SeqCst) - 1)
    }

    /// Drops all items without resetting the cursor counter.
    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Returns how many items the log holds.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if the log holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> UpdatePayload {
        UpdatePayload::Message { text: text.into() }
    }

    #[test]
    fn cursors_are_assigned_in_order() {
        let log = UpdateLog::new();
        assert_eq!(log.latest(), Cursor::ZERO);

        let first = log.append(message("a"));
        let second = log.append(message("b"));
        assert!(second > first);
        assert_eq!(log.latest(), second);
    }

    #[test]
    fn since_returns_only_newer_items() {
        let log = UpdateLog::new();
        let first = log.append(message("a"));
        log.append(message("b"));

        let batch = log.since(first, 64);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.next, Some(log.latest()));

        let empty = log.since(log.latest(), 64);
        assert!(empty.items.is_empty());
        assert_eq!(empty.next, Some(log.latest()));
    }

    #[test]
    fn truncated_batch_does_not_overreport_progress() {
        let log = UpdateLog::new();
        for n in 0..5 {
            log.append(message(&format!("m{n}")));
        }

        let batch = log.since(Cursor::ZERO, 2);
        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.next, None);
        // The client's effective progress is the last delivered item.
        assert_eq!(batch.max_cursor(), Some(batch.items[1].cursor));
    }

    #[test]
    fn clear_keeps_counting() {
        let log = UpdateLog::new();
        log.append(message("a"));
        let before = log.latest();

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.latest(), before);

        let after = log.append(message("b"));
        assert!(after > before);
    }
}
