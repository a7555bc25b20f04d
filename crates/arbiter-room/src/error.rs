//! Error types for room operations.

use thiserror::Error;

/// Why a join attempt was refused.
///
/// The `Display` strings are part of the wire contract: the broker sends
/// them verbatim in `error` events, and deployed clients match on them.
/// Do not reword.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoomError {
    /// No room with that id — never created, already torn down, or the
    /// id was mistyped. Deliberately identical for all three so a join
    /// code leaks nothing about room history.
    #[error("room does not exist")]
    NotFound,

    /// The room exists but has no occupants to play against.
    #[error("room is empty")]
    Empty,

    /// Both seats are taken.
    #[error("room is full")]
    Full,
}
