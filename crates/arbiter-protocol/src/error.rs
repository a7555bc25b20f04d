//! What can go wrong between an event and its bytes.
//!
//! Each crate in Arbiter defines its own error enum. This keeps failures
//! specific and meaningful — a `ProtocolError` is always about turning
//! events into bytes or back, never about networking or rooms.

/// Failures of encoding, decoding, or id parsing.
///
/// `#[derive(thiserror::Error)]` generates the `std::error::Error`
/// implementation; the `#[error("...")]` attributes are the messages that
/// end up in logs.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an event into bytes).
    ///
    /// With well-formed event types this should be unreachable, which is
    /// exactly why it is an error and not a panic: if it ever fires,
    /// something structural broke and we want the log line, not a crash.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into an event).
    ///
    /// Common causes: malformed JSON, an unknown `type` tag, missing
    /// required fields, or a frame that isn't ours at all.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room id string is not 32 hex characters.
    ///
    /// Raised both by `RoomId::from_str` and, through it, by deserializing
    /// any event that carries a room id.
    #[error("invalid room id: {0}")]
    InvalidRoomId(String),
}
