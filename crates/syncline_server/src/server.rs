//! The demo server facade.

use crate::config::ServerConfig;
use crate::handler::RequestHandler;
use crate::words::SuggestionIndex;
use syncline_protocol::{Cursor, SeatId, SeatStatus, UpdatePayload};

/// The in-memory reference backend.
///
/// One value of this type is one backend world. Expose
/// [`handle`](Self::handle) behind an HTTP shim for real clients, or hand
/// it to a loopback transport for tests and demos.
///
/// # Example
///
/// ```
/// use syncline_server::{DemoServer, ServerConfig};
///
/// let server = DemoServer::new(ServerConfig::default());
/// let response = server.handle(br#"{"op":"updates","since":0}"#);
/// assert!(!response.is_empty());
/// ```
pub struct DemoServer {
    handler: RequestHandler,
}

impl DemoServer {
    /// Creates a server with the built-in dictionary.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_dictionary(config, SuggestionIndex::common_words())
    }

    /// Creates a server with a custom suggestion dictionary.
    pub fn with_dictionary(config: ServerConfig, words: SuggestionIndex) -> Self {
        Self {
            handler: RequestHandler::new(config, words),
        }
    }

    /// Handles one raw request body and returns the raw response body.
    pub fn handle(&self, body: &[u8]) -> Vec<u8> {
        self.handler.handle_bytes(body)
    }

    /// Releases a held seat back to free, as the server-defined expiry
    /// transition, and publishes it. Returns false if the seat was not
    /// held.
    pub fn release_seat(&self, seat: SeatId) -> bool {
        match self.handler.seats().release(seat) {
            Some(update) => {
                self.handler.log().append(UpdatePayload::Seat(update));
                true
            }
            None => false,
        }
    }

    /// Publishes a stock quote observation into the update stream.
    pub fn publish_quote(&self, symbol: impl Into<String>, price: f64) -> Cursor {
        self.handler.log().append(UpdatePayload::Quote {
            symbol: symbol.into(),
            price,
        })
    }

    /// Returns the cursor of the most recently committed change.
    pub fn cursor(&self) -> Cursor {
        self.handler.log().latest()
    }

    /// Returns how many updates the log holds.
    pub fn update_count(&self) -> usize {
        self.handler.log().len()
    }

    /// Returns the status of a seat.
    pub fn seat_status(&self, seat: SeatId) -> Option<SeatStatus> {
        self.handler.seats().status(seat)
    }
}
