//! Core protocol types for Arbiter's wire format.
//!
//! This module defines every type that travels "on the wire" — the
//! structures that get serialized to JSON, sent over the WebSocket, and
//! deserialized on the other side. Client events flow in, server events
//! flow out, and the identity types appear inside both.
//!
//! The JSON shapes here are a compatibility contract: existing clients
//! already speak this exact format, so the serde attributes below are
//! load-bearing, not cosmetic.

// Serde is Rust's standard serialization framework. The two key traits:
//   - `Serialize`:   "I can be turned INTO JSON"
//   - `Deserialize`: "I can be created FROM JSON"
// The derive macro generates both; we only hand-write them where the wire
// shape can't be expressed with attributes (see `RoomId`).
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity of one connected player.
///
/// A player IS a live connection: the server mints one of these per accepted
/// connection, and when that connection drops the identity is gone with it.
/// There is no account behind it — accounts live in a separate credential
/// service, and the only trace of one here is the optional display name on
/// [`Player`].
///
/// This is a newtype wrapper around `u64`. Wrapping buys two things:
///
/// 1. **Type safety**: you can't pass a `PlayerId` where a raw counter or a
///    different id is expected, even though it's a `u64` underneath.
/// 2. **Readability**: `fn kick(player: PlayerId)` says more than
///    `fn kick(player: u64)`.
///
/// `#[serde(transparent)]` makes it serialize as the bare number — a
/// `PlayerId(42)` is just `42` in JSON, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

/// `Display` is what log lines interpolate: a bare `{player_id}` prints
/// `player-42`.
impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// A unique identifier for a room (one match between two players).
///
/// Room ids double as the join codes players share with each other, so the
/// wire form is a string: 32 lowercase hex characters encoding 128 random
/// bits. Two reasons it is NOT a JSON number like [`PlayerId`]:
///
/// 1. A 128-bit value does not survive JSON numbers — JavaScript parses
///    them as 64-bit floats and silently destroys the low bits.
/// 2. Join codes get pasted into chat messages and input fields; an opaque
///    fixed-width token is the natural shape for that.
///
/// The serde impls are hand-written because `transparent` would emit the
/// inner `u128`. `Display` renders the canonical form and `FromStr` parses
/// it back, so the same code path serves logging, serde, and user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(pub u128);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Fixed width keeps ids canonical: every id the server hands out
        // is exactly 32 hex chars, so anything else is not one of ours.
        if s.len() != 32 {
            return Err(ProtocolError::InvalidRoomId(s.to_string()));
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ProtocolError::InvalidRoomId(s.to_string()))
    }
}

impl Serialize for RoomId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // `collect_str` routes through our `Display` impl.
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Player and room state
// ---------------------------------------------------------------------------

/// A player as seen from inside a room.
///
/// The `username` is whatever display name the connection had bound at the
/// moment it created or joined the room — `None` if it never bound one.
/// It is a snapshot, not a live reference: renaming after joining does not
/// rewrite the roster already sent to the opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The connection-scoped identity.
    pub id: PlayerId,
    /// Display name bound at create/join time, if any.
    pub username: Option<String>,
}

/// The state of a room as reported to clients.
///
/// Sent as the reply to a successful join and as the payload of
/// `opponentJoined`. The roster order is meaningful: index 0 is the creator
/// and moves first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// The room's join code.
    pub room_id: RoomId,
    /// Occupants in arrival order.
    pub players: Vec<Player>,
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a notification?
// ---------------------------------------------------------------------------

/// Specifies which room occupants should receive a server event.
///
/// The dispatcher resolves this against the room's roster at send time.
/// This never travels on the wire — it is routing metadata between the
/// broker and the room's outbound queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every occupant of the room.
    All,

    /// One specific occupant.
    Player(PlayerId),

    /// Every occupant EXCEPT the one named.
    /// This is the "tell the opponent" scope: move relays and
    /// join/close notifications go to everyone but the actor.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// ClientEvent — what clients send
// ---------------------------------------------------------------------------

/// Events sent by clients.
///
/// `#[serde(tag = "type")]` makes these internally tagged: the JSON is one
/// flat object with a `"type"` discriminator, e.g.
/// `{ "type": "joinRoom", "roomId": "4f2a…" }`. Flat objects are what
/// JavaScript clients naturally produce.
///
/// `rename_all` converts the variant names (`JoinRoom` → `"joinRoom"`) and
/// `rename_all_fields` the field names (`room_id` → `"roomId"`), so the
/// Rust side keeps its conventions while the wire keeps the client's.
///
/// One wart is contractual: the move event addresses its room with a field
/// named `room`, while join/close use `roomId`. Deployed clients send it
/// that way, so it stays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Binds or replaces this connection's display name.
    ///
    /// May arrive at any time. Room rosters capture the name current at
    /// create/join; later bindings affect only future room operations.
    Username { username: String },

    /// Opens a new room with the sender as its first (and for now only)
    /// occupant. Always succeeds; the reply is `roomCreated`.
    CreateRoom,

    /// Joins an existing room by its code. Replied to with `roomJoined`
    /// on success or `error` on failure.
    JoinRoom { room_id: RoomId },

    /// Submits a move in the given room. Never directly replied to:
    /// accepted moves surface to the opponent, rejected ones surface as
    /// `illegalMove` to the whole room, and everything else is silence.
    Move {
        room: RoomId,
        #[serde(rename = "move")]
        mv: String,
    },

    /// Tears the room down, notifying the other occupants.
    CloseRoom { room_id: RoomId },
}

// ---------------------------------------------------------------------------
// ServerEvent — what the server sends
// ---------------------------------------------------------------------------

/// Events sent by the server.
///
/// Same tagging scheme as [`ClientEvent`]. One deliberate irregularity:
/// the game-over tag is all-lowercase `"gameover"`, not `"gameOver"` —
/// that is the event name clients already listen for, preserved via an
/// explicit rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Reply to `createRoom`: here is your join code.
    RoomCreated { room_id: RoomId },

    /// Reply to a successful `joinRoom`: the full room state.
    RoomJoined { room: RoomSnapshot },

    /// Reply to a failed `joinRoom`. The message is one of the fixed
    /// strings clients match on: "room does not exist", "room is empty",
    /// "room is full".
    Error { message: String },

    /// To occupants already in the room when someone joins.
    OpponentJoined { room: RoomSnapshot },

    /// An accepted move, relayed to the opponent.
    Move {
        #[serde(rename = "move")]
        mv: String,
    },

    /// The rules engine rejected a move. Sent to the whole room; the room
    /// is gone by the time anyone reads this.
    IllegalMove { message: String },

    /// The game reached a terminal state. Carries the final serialized
    /// position; sent to the whole room just before it is torn down.
    #[serde(rename = "gameover")]
    GameOver { position: String },

    /// The other occupant's connection dropped.
    PlayerDisconnected { player: Player },

    /// The room was closed by the named room's other occupant.
    CloseRoom { room_id: RoomId },
}

// =========================================================================
// Tests
// =========================================================================
