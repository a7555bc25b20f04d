//! The `RulesEngine` trait — the seam where game rules plug in.
//!
//! Arbiter doesn't know how to play anything. Legality, turn order inside
//! a position, and end-of-game detection all belong to an external rules
//! engine; the broker only asks questions and relays answers. Any game
//! whose rules fit this trait (chess, checkers, tic-tac-toe) plugs in
//! without touching the broker.
//!
//! # Why a trait seam
//!
//! A trait defines WHAT the broker needs without fixing HOW it is
//! computed. A production server binds a full chess engine here; the
//! test suites bind tiny deterministic games. Framework code is identical
//! in both cases.

use std::fmt;

/// Which seat owns the next move.
///
/// Seats are fixed by arrival order: the room's creator sits
/// [`First`](Seat::First) and moves first, the joiner sits
/// [`Second`](Seat::Second). The engine reports seats; the broker maps
/// them onto the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// The creator's seat. Owns the opening move.
    First,
    /// The joiner's seat.
    Second,
}

impl Seat {
    /// The roster index this seat corresponds to.
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => write!(f, "first"),
            Seat::Second => write!(f, "second"),
        }
    }
}

/// A move the rules engine refused.
///
/// The reason is for server logs only — clients get a fixed notice,
/// never engine internals.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct MoveRejected {
    reason: String,
}

impl MoveRejected {
    /// Creates a rejection with a loggable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The rules collaborator bound to one room.
///
/// Exactly one engine instance exists per room, created together with the
/// room and dropped with it. All mutation goes through [`apply_move`]
/// while the room's lock is held, so implementations need no internal
/// synchronization — `Send + 'static` is enough to live inside the
/// room behind its mutex.
///
/// Moves are opaque strings. The engine defines the notation; the broker
/// relays accepted moves verbatim and never parses them.
///
/// [`apply_move`]: RulesEngine::apply_move
pub trait RulesEngine: Send + 'static {
    /// Creates an engine holding the game's start position.
    fn new_game() -> Self;

    /// Validates and applies one move.
    ///
    /// On `Ok` the position has advanced. On `Err` the position is
    /// unchanged — but the room is torn down anyway, so "unchanged"
    /// matters only to the engine's own invariants.
    fn apply_move(&mut self, mv: &str) -> Result<(), MoveRejected>;

    /// The seat that owns the next move in the current position.
    fn turn_owner(&self) -> Seat;

    /// `true` once the position is terminal (win, draw, any end state).
    fn is_terminal(&self) -> bool;

    /// Canonical textual encoding of the current position (chess: FEN).
    fn position(&self) -> String;

    /// Full-game record in the engine's notation (chess: PGN).
    fn record(&self) -> String;

    /// Every accepted move so far, in order.
    fn history(&self) -> Vec<String>;
}
