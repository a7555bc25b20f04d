//! The single error type surfaced by the meta-crate.

use arbiter_protocol::ProtocolError;
use arbiter_room::RoomError;
use arbiter_transport::TransportError;

/// Any failure from the layered crates, folded into one enum.
///
/// Callers of the `arbiter` meta-crate match on this instead of
/// importing three error types; `#[from]` on each variant gives the
/// `?` operator its conversions.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    /// From the network layer: bind, accept, send, recv.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// From the wire format: encode, decode, malformed room id.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// From room bookkeeping: does not exist, empty, full.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arbiter_error_wraps_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: ArbiterError = TransportError::SendFailed(io).into();
        assert!(matches!(err, ArbiterError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_arbiter_error_wraps_protocol_error() {
        let err: ArbiterError =
            ProtocolError::InvalidRoomId("zzz".into()).into();
        assert!(matches!(err, ArbiterError::Protocol(_)));
    }

    #[test]
    fn test_arbiter_error_wraps_room_error_keeping_display() {
        let err: ArbiterError = RoomError::NotFound.into();
        assert!(matches!(err, ArbiterError::Room(_)));
        assert_eq!(err.to_string(), "room does not exist");
    }
}
