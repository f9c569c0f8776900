//! Collaborator interfaces the core calls out to.
//!
//! The core never draws anything itself: ordered update items go to an
//! [`UpdateSink`], lane failures go to an [`ErrorSink`], and lookup results
//! go to a [`SuggestionSink`]. In-memory implementations are provided for
//! tests and headless use.

use parking_lot::Mutex;
use std::fmt;
use syncline_protocol::UpdateItem;

/// One of the three independent asynchronous control flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// The continuous update feed.
    Updates,
    /// Generation-tagged lookups.
    Lookup,
    /// Seat claim/commit calls.
    Reservation,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Updates => write!(f, "updates"),
            Lane::Lookup => write!(f, "lookup"),
            Lane::Reservation => write!(f, "reservation"),
        }
    }
}

/// Receives update items in arrival order and draws them.
pub trait UpdateSink: Send + Sync {
    /// Renders one item. Items arrive in the order the server produced
    /// them; the sink must not assume it will see any item twice.
    fn render(&self, item: &UpdateItem);
}

/// Receives human-readable failure messages, keyed by lane.
///
/// A lane reports once when it stops; the surface shows the last message
/// until a later successful cycle in that lane overwrites it.
pub trait ErrorSink: Send + Sync {
    /// Reports one failure.
    fn report(&self, lane: Lane, message: &str);
}

/// Receives lookup results for the suggestion surface.
pub trait SuggestionSink: Send + Sync {
    /// Replaces the suggestion surface with `words`.
    fn show(&self, words: &[String]);

    /// Clears the suggestion surface.
    fn clear(&self);
}

/// An update sink that records rendered items.
#[derive(Default)]
pub struct MemoryRenderer {
    items: Mutex<Vec<UpdateItem>>,
}

impl MemoryRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every rendered item in arrival order.
    pub fn items(&self) -> Vec<UpdateItem> {
        self.items.lock().clone()
    }

    /// Returns how many items have been rendered.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns true if nothing has been rendered.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl UpdateSink for MemoryRenderer {
    fn render(&self, item: &UpdateItem) {
        self.items.lock().push(item.clone());
    }
}

/// An error sink that records reports.
#[derive(Default)]
pub struct MemoryErrors {
    reports: Mutex<Vec<(Lane, String)>>,
}

impl MemoryErrors {
    /// Creates an empty error sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every report in arrival order.
    pub fn reports(&self) -> Vec<(Lane, String)> {
        self.reports.lock().clone()
    }

    /// Returns the most recent message for a lane, if any.
    pub fn last_for(&self, lane: Lane) -> Option<String> {
        self.reports
            .lock()
            .iter()
            .rev()
            .find(|(l, _)| *l == lane)
            .map(|(_, message)| message.clone())
    }
}

impl ErrorSink for MemoryErrors {
    fn report(&self, lane: Lane, message: &str) {
        self.reports.lock().push((lane, message.to_string()));
    }
}

/// A suggestion sink that records the current surface and its history.
#[derive(Default)]
pub struct MemorySuggestions {
    current: Mutex<Vec<String>>,
    shown: Mutex<Vec<Vec<String>>>,
}

impl MemorySuggestions {
    /// Creates an empty suggestion sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the suggestions currently on the surface.
    pub fn current(&self) -> Vec<String> {
        self.current.lock().clone()
    }

    /// Returns every set of suggestions ever shown, in order.
    pub fn shown(&self) -> Vec<Vec<String>> {
        self.shown.lock().clone()
    }
}

impl SuggestionSink for MemorySuggestions {
    fn show(&self, words: &[String]) {
        *self.current.lock() = words.to_vec();
        self.shown.lock().push(words.to_vec());
    }

    fn clear(&self) {
        self.current.lock().clear();
    }
}
