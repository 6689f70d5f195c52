//! Opaque pagination tokens
//!
//! A [`Cursor`] marks a position `(sort_key, id)` in the total order of a
//! list view. It travels to the client as an opaque token (URL-safe base64 of
//! a small JSON object) and comes back verbatim in `after` / `before` query
//! parameters.
//!
//! Tokens are untrusted. [`Cursor::decode`] never fails loudly: a malformed
//! or tampered token yields `None`, which callers treat exactly like "no
//! cursor supplied".

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Why a token could not be turned back into a cursor
#[derive(Error, Debug)]
pub enum CursorError {
    #[error("CursorError - Base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("CursorError - Utf8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("CursorError - Json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CursorError - EmptyToken")]
    EmptyToken,
}

/// A position in a `(sort_key, id)` ordering.
///
/// `sort_key` is always the folded projection the list is ordered by, never
/// the raw display value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor {
    sort_key: String,
    id: Uuid,
}

#[derive(Serialize, Deserialize)]
struct CursorPayload {
    k: String,
    id: Uuid,
}

impl Cursor {
    pub fn new(sort_key: impl Into<String>, id: Uuid) -> Self {
        Self {
            sort_key: sort_key.into(),
            id,
        }
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Encode into an opaque, URL-safe token
    pub fn encode(&self) -> String {
        let payload = CursorPayload {
            k: self.sort_key.clone(),
            id: self.id,
        };
        // A struct of a String and a Uuid always serializes.
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Strict decoding, reporting why a token was rejected
    pub fn try_decode(token: &str) -> Result<Self, CursorError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CursorError::EmptyToken);
        }
        let bytes = URL_SAFE_NO_PAD.decode(token.as_bytes())?;
        let json = String::from_utf8(bytes)?;
        let payload: CursorPayload = serde_json::from_str(&json)?;
        Ok(Self {
            sort_key: payload.k,
            id: payload.id,
        })
    }

    /// Fail-soft decoding: any bad token is treated as absent
    pub fn decode(token: &str) -> Option<Self> {
        match Self::try_decode(token) {
            Ok(cursor) => Some(cursor),
            Err(CursorError::EmptyToken) => None,
            Err(err) => {
                tracing::debug!(error = %err, "discarding unreadable cursor token");
                None
            }
        }
    }

    /// Decode an optional query parameter
    pub fn decode_param(token: Option<&str>) -> Option<Self> {
        token.and_then(Self::decode)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}
