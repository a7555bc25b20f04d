//! The [`Codec`] seam between typed events and wire bytes.
//!
//! The server loop never serializes anything itself — it hands values to
//! a [`Codec`] and ships the bytes it gets back. The concrete format is
//! picked at build time. Today that is JSON ([`JsonCodec`]) because the
//! deployed clients speak JSON text frames; a binary codec could slot in
//! without touching the loop.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because the codec is stored in shared server
/// state and used from every connection task concurrently.
///
/// The methods are generic over the value type: `encode` accepts anything
/// `Serialize`, `decode` produces anything `DeserializeOwned`.
/// `DeserializeOwned` (rather than `Deserialize<'de>`) means the decoded
/// value owns all its data — the input buffer is dropped right after
/// decoding, so borrowing from it is off the table.
pub trait Codec: Send + Sync + 'static {
    /// Turns a value into its wire bytes.
    ///
    /// # Errors
    /// `ProtocolError::Encode` when the value cannot be represented in
    /// the target format.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Parses wire bytes back into a typed value.
    ///
    /// # Errors
    /// `ProtocolError::Decode` when the bytes are malformed or describe
    /// a different type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// JSON [`Codec`] built on `serde_json`.
///
/// JSON is the wire contract here, not a development convenience: browser
/// clients build these events with object literals and read them back with
/// `JSON.parse`. It is also pleasant to debug — every frame is readable in
/// DevTools and in server logs.
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use arbiter_protocol::{Codec, JsonCodec, RoomId, ServerEvent};
///
/// let codec = JsonCodec;
///
/// let event = ServerEvent::RoomCreated { room_id: RoomId(7) };
/// let bytes = codec.encode(&event).unwrap();
///
/// let decoded: ServerEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, event);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
