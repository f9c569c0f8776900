//! Request and reply envelopes.

use crate::cursor::Cursor;
use crate::error::{ProtocolError, ProtocolResult};
use crate::seat::{ClaimantId, SeatId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A request to the backend.
///
/// Every operation travels to the same endpoint as a JSON object tagged
/// with an `op` field; the remaining fields are operation-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    /// Reset the backend's world state.
    Init,
    /// Post a chat message.
    Post {
        /// Message text.
        text: String,
    },
    /// Fetch updates newer than `since`.
    Updates {
        /// Everything at or below this cursor has already been observed.
        since: Cursor,
    },
    /// Look up completions for a prefix.
    Suggest {
        /// The word prefix under the user's caret.
        prefix: String,
    },
    /// Request exclusive hold of one seat.
    Hold {
        /// The seat to hold.
        seat: SeatId,
        /// Who is asking.
        claimant: ClaimantId,
    },
    /// Finalize every seat currently held by `claimant`.
    Book {
        /// Whose holds to finalize.
        claimant: ClaimantId,
    },
}

impl Request {
    /// Returns the operation tag.
    pub fn op(&self) -> &'static str {
        match self {
            Request::Init => "init",
            Request::Post { .. } => "post",
            Request::Updates { .. } => "updates",
            Request::Suggest { .. } => "suggest",
            Request::Hold { .. } => "hold",
            Request::Book { .. } => "book",
        }
    }

    /// Encodes the request to its JSON wire form.
    pub fn to_json(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a request from its JSON wire form.
    pub fn from_json(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// The reply envelope: exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: serde::Deserialize<'de>"
))]
pub struct Reply<T> {
    /// The operation result, on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// A human-readable error, on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Reply<T> {
    /// Creates a success reply.
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error reply.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Collapses the envelope into a `Result`.
    ///
    /// A reply carrying neither field is malformed; the server contract is
    /// that every reply has exactly one of the two.
    pub fn into_result(self) -> ProtocolResult<T> {
        match (self.result, self.error) {
            (Some(result), None) => Ok(result),
            (_, Some(error)) => Err(ProtocolError::Server(error)),
            (None, None) => Err(ProtocolError::Malformed(
                "reply carries neither result nor error".into(),
            )),
        }
    }
}

impl<T: Serialize> Reply<T> {
    /// Encodes the reply to its JSON wire form.
    pub fn to_json(&self) -> ProtocolResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl<T: DeserializeOwned> Reply<T> {
    /// Decodes a reply from its JSON wire form.
    pub fn from_json(bytes: &[u8]) -> ProtocolResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// The server's authoritative answer to a `hold` or `book` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the request took effect.
    pub accepted: bool,
}

impl Verdict {
    /// An accepting verdict.
    pub fn accept() -> Self {
        Self { accepted: true }
    }

    /// A rejecting verdict.
    pub fn reject() -> Self {
        Self { accepted: false }
    }
}
