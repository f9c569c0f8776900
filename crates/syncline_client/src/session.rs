//! One client's session: configuration, identity, and the three lanes.

use crate::arbitrate::{trailing_word, LookupArbitrator};
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::feed::UpdateFeed;
use crate::identity::generate_claimant_id;
use crate::reserve::{HoldOutcome, SeatCoordinator};
use crate::seatmap::SeatMap;
use crate::sink::{ErrorSink, SuggestionSink, UpdateSink};
use crate::transport::Transport;
use std::sync::Arc;
use syncline_protocol::{ClaimantId, SeatId, UpdateItem};

/// Routes update items to the renderer and keeps the seat view current.
///
/// The seat map is fed first so a renderer that consults it during
/// drawing sees the state including the item being drawn.
struct FanoutSink {
    seats: Arc<SeatMap>,
    renderer: Arc<dyn UpdateSink>,
}

impl UpdateSink for FanoutSink {
    fn render(&self, item: &UpdateItem) {
        self.seats.render(item);
        self.renderer.render(item);
    }
}

/// An explicit client session owning what the original front-ends kept as
/// ambient globals: configuration, the last-queried token, the generation
/// counter, and the claimant identity.
///
/// The session's three lanes (update feed, lookup arbitration, seat
/// reservation) run independently; any number of reservation calls may
/// overlap one feed cycle and one in-flight lookup. Construction wires the
/// lanes, [`start`](Self::start) begins the feed, and
/// [`shutdown`](Self::shutdown) tears everything down without leaking
/// threads.
pub struct ClientSession<T: Transport + 'static> {
    config: ClientConfig,
    transport: Arc<T>,
    feed: Arc<UpdateFeed<T>>,
    lookups: Arc<LookupArbitrator<T>>,
    coordinator: SeatCoordinator<T>,
    seats: Arc<SeatMap>,
    cancel: CancelToken,
}

impl<T: Transport + 'static> ClientSession<T> {
    /// Wires a session from its collaborators.
    pub fn new(
        config: ClientConfig,
        transport: T,
        renderer: Arc<dyn UpdateSink>,
        suggestions: Arc<dyn SuggestionSink>,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        let transport = Arc::new(transport);
        let seats = Arc::new(SeatMap::new());
        let claimant = config.claimant.unwrap_or_else(generate_claimant_id);

        let fanout: Arc<dyn UpdateSink> = Arc::new(FanoutSink {
            seats: Arc::clone(&seats),
            renderer,
        });
        let feed = Arc::new(UpdateFeed::new(
            Arc::clone(&transport),
            fanout,
            Arc::clone(&errors),
        ));
        let lookups = Arc::new(LookupArbitrator::new(
            Arc::clone(&transport),
            suggestions,
            errors,
        ));
        let coordinator = SeatCoordinator::new(Arc::clone(&transport), claimant);

        Self {
            config,
            transport,
            feed,
            lookups,
            coordinator,
            seats,
            cancel: CancelToken::new(),
        }
    }

    /// Starts the update feed from the configured initial cursor.
    pub fn start(&self) -> ClientResult<()> {
        self.feed.start(self.config.initial_cursor)
    }

    /// Stops the feed, invalidates outstanding lookups, and joins every
    /// worker thread.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        self.feed.stop();
        self.lookups.reset();
        self.lookups.quiesce();
    }

    /// Reacts to the user-visible input changing.
    ///
    /// The lookup operates on the word under the caret, extracted from the
    /// whole entry here so callers can hand over the raw input field.
    pub fn edit(&self, input: &str) {
        self.lookups.on_edit(trailing_word(input));
    }

    /// Clears the suggestion surface, e.g. after accepting a completion.
    pub fn reset_lookups(&self) {
        self.lookups.reset();
    }

    /// Requests exclusive hold of one seat.
    pub fn hold_seat(&self, seat: SeatId) -> ClientResult<HoldOutcome> {
        self.coordinator.hold(seat, &self.cancel)
    }

    /// Requests finalization of every seat this session holds.
    pub fn book_seats(&self) -> ClientResult<bool> {
        self.coordinator.book(&self.cancel)
    }

    /// Posts a chat message.
    pub fn post_message(&self, text: &str) -> ClientResult<String> {
        self.transport.post(text, &self.cancel)
    }

    /// Resets the backend's world state.
    pub fn reset_backend(&self) -> ClientResult<String> {
        self.transport.init(&self.cancel)
    }

    /// Returns this session's claimant identity.
    pub fn claimant(&self) -> ClaimantId {
        self.coordinator.claimant()
    }

    /// Returns the session's view of the seat pool.
    pub fn seat_view(&self) -> &Arc<SeatMap> {
        &self.seats
    }

    /// Returns the update feed lane.
    pub fn feed(&self) -> &Arc<UpdateFeed<T>> {
        &self.feed
    }

    /// Returns the lookup arbitration lane.
    pub fn lookups(&self) -> &Arc<LookupArbitrator<T>> {
        &self.lookups
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
