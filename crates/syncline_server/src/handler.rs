//! Request dispatch.

use crate::config::ServerConfig;
use crate::log::UpdateLog;
use crate::seats::{HoldDecision, SeatTable};
use crate::words::SuggestionIndex;
use serde::Serialize;
use syncline_protocol::{Reply, Request, UpdatePayload, Verdict};

/// Dispatches decoded requests to the world state and wraps results in
/// the reply envelope.
///
/// Every failure mode (a malformed request, an unknown operation, a
/// nonexistent seat) is reported inside the envelope, so transports only
/// ever see a response body.
pub struct RequestHandler {
    config: ServerConfig,
    log: UpdateLog,
    seats: SeatTable,
    words: SuggestionIndex,
}

impl RequestHandler {
    /// Creates a handler with a freshly seeded world.
    pub fn new(config: ServerConfig, words: SuggestionIndex) -> Self {
        let handler = Self {
            config,
            log: UpdateLog::new(),
            seats: SeatTable::new(),
            words,
        };
        handler.reset_world();
        handler
    }

    /// Returns the update log.
    pub fn log(&self) -> &UpdateLog {
        &self.log
    }

    /// Returns the seat table.
    pub fn seats(&self) -> &SeatTable {
        &self.seats
    }

    /// Reseeds the seat pool and publishes the fresh state.
    ///
    /// Returns the number of seats seeded. The log is cleared but keeps
    /// its cursor counter, so clients already past the old positions see
    /// only the new world.
    pub fn reset_world(&self) -> u32 {
        self.log.clear();
        for update in self.seats.seed(self.config.seat_count) {
            self.log.append(UpdatePayload::Seat(update));
        }
        self.config.seat_count
    }

    /// Handles one raw request body and returns the raw response body.
    pub fn handle_bytes(&self, body: &[u8]) -> Vec<u8> {
        match Request::from_json(body) {
            Ok(request) => self.handle(request),
            Err(err) => encode(Reply::<()>::err(format!("bad request: {err}"))),
        }
    }

    /// Handles one decoded request.
    pub fn handle(&self, request: Request) -> Vec<u8> {
        tracing::debug!(op = request.op(), "handling request");
        match request {
            Request::Init => {
                let count = self.reset_world();
                encode(Reply::ok(format!("reset complete, {count} seats free")))
            }
            Request::Post { text } => {
                let cursor = self.log.append(UpdatePayload::Message { text });
                encode(Reply::ok(format!("posted at {cursor}")))
            }
            Request::Updates { since } => {
                encode(Reply::ok(self.log.since(since, self.config.batch_limit)))
            }
            Request::Suggest { prefix } => encode(Reply::ok(
                self.words.suggest(&prefix, self.config.suggestion_limit),
            )),
            Request::Hold { seat, claimant } => match self.seats.hold(seat, claimant) {
                HoldDecision::Accepted(update) => {
                    self.log.append(UpdatePayload::Seat(update));
                    encode(Reply::ok(Verdict::accept()))
                }
                HoldDecision::Rejected => encode(Reply::ok(Verdict::reject())),
                HoldDecision::UnknownSeat => encode(Reply::<Verdict>::err(format!(
                    "no such seat: {}",
                    seat.number()
                ))),
            },
            Request::Book { claimant } => {
                let booked = self.seats.book(claimant);
                for update in &booked {
                    self.log.append(UpdatePayload::Seat(*update));
                }
                let verdict = if booked.is_empty() {
                    Verdict::reject()
                } else {
                    Verdict::accept()
                };
                encode(Reply::ok(verdict))
            }
        }
    }
}

fn encode<T: Serialize>(reply: Reply<T>) -> Vec<u8> {
    reply
        .to_json()
        .unwrap_or_else(|_| br#"{"error":"internal encoding failure"}"#.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncline_protocol::{ClaimantId, Cursor, SeatId, UpdateBatch};

    fn handler() -> RequestHandler {
        RequestHandler::new(ServerConfig::default(), SuggestionIndex::common_words())
    }

    fn reply<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Reply<T> {
        Reply::from_json(bytes).unwrap()
    }

    #[test]
    fn fresh_world_publishes_free_seats() {
        let h = handler();
        let bytes = h.handle(Request::Updates {
            since: Cursor::ZERO,
        });
        let batch: UpdateBatch = reply::<UpdateBatch>(&bytes).into_result().unwrap();
        assert_eq!(batch.items.len(), 10);
    }

    #[test]
    fn hold_and_book_flow_through_the_log() {
        let h = handler();
        let seat = SeatId::new(7);
        let a = ClaimantId::new(1);
        let b = ClaimantId::new(2);

        let bytes = h.handle(Request::Hold { seat, claimant: a });
        let verdict: Verdict = reply::<Verdict>(&bytes).into_result().unwrap();
        assert!(verdict.accepted);

        let bytes = h.handle(Request::Hold { seat, claimant: b });
        let verdict: Verdict = reply::<Verdict>(&bytes).into_result().unwrap();
        assert!(!verdict.accepted);

        let bytes = h.handle(Request::Book { claimant: a });
        let verdict: Verdict = reply::<Verdict>(&bytes).into_result().unwrap();
        assert!(verdict.accepted);

        // 10 seeded + 1 hold + 1 book; the rejected hold published nothing.
        assert_eq!(h.log().len(), 12);
    }

    #[test]
    fn unknown_seat_is_an_error_envelope() {
        let h = handler();
        let bytes = h.handle(Request::Hold {
            seat: SeatId::new(99),
            claimant: ClaimantId::new(1),
        });
        let result = reply::<Verdict>(&bytes).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn book_with_no_holds_is_rejected() {
        let h = handler();
        let bytes = h.handle(Request::Book {
            claimant: ClaimantId::new(5),
        });
        let verdict: Verdict = reply::<Verdict>(&bytes).into_result().unwrap();
        assert!(!verdict.accepted);
    }

    #[test]
    fn malformed_body_yields_error_envelope() {
        let h = handler();
        let bytes = h.handle_bytes(b"{not json");
        let result = reply::<Verdict>(&bytes).into_result();
        assert!(result.is_err());

        let bytes = h.handle_bytes(br#"{"op":"teleport"}"#);
        let result = reply::<Verdict>(&bytes).into_result();
        assert!(result.is_err());
    }

    #[test]
    fn init_resets_but_cursor_keeps_growing() {
        let h = handler();
        h.handle(Request::Post {
            text: "hello".into(),
        });
        let latest = h.log().latest();

        let bytes = h.handle(Request::Init);
        let ack: String = reply::<String>(&bytes).into_result().unwrap();
        assert!(ack.contains("10 seats"));

        // A client already at `latest` only sees the fresh world.
        let batch: UpdateBatch = reply::<UpdateBatch>(&h.handle(Request::Updates {
            since: latest,
        }))
        .into_result()
        .unwrap();
        assert_eq!(batch.items.len(), 10);
        assert!(batch.items.iter().all(|item| item.cursor > latest));
    }

    #[test]
    fn suggest_honors_the_configured_limit() {
        let h = RequestHandler::new(
            ServerConfig::default().with_suggestion_limit(2),
            SuggestionIndex::common_words(),
        );
        let bytes = h.handle(Request::Suggest {
            prefix: "ca".into(),
        });
        let words: Vec<String> = reply::<Vec<String>>(&bytes).into_result().unwrap();
        assert_eq!(words.len(), 2);
    }
}
