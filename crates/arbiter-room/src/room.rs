//! The room entity: two seats, an engine, and the outbound queues.
//!
//! A room owns everything about one match — the roster (whose order IS
//! the turn order), one rules engine instance, the per-occupant outbound
//! channels, and a stored lifecycle phase. It is also the notification
//! dispatcher: every server event that reaches a room occupant goes
//! through [`Room::dispatch`].
//!
//! Rooms never lock anything themselves. The registry wraps each room in
//! an async mutex, and callers hold that lock for a whole
//! read-modify-write; methods here assume exclusive access.

use arbiter_protocol::{
    Player, PlayerId, Recipient, RoomId, RoomSnapshot, ServerEvent,
};
use tokio::sync::mpsc;

use crate::{CompletedGame, MoveRejected, RulesEngine};

/// Channel sender delivering server events to one occupant's connection.
///
/// The receiving half lives in the connection's handler task, which pumps
/// events onto the socket. Sends are fire-and-forget; a closed receiver
/// means the occupant is gone and the event evaporates.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// The lifecycle phase stored on a room.
///
/// ```text
/// WaitingForOpponent ──(join)──→ Active ──┐
///         │                              │ illegal move, game over,
///         └──────(creator leaves)────────┴─(close, disconnect)──→ Terminated
/// ```
///
/// `Terminated` is a tombstone. Removal from the registry and the last
/// holder dropping its `Arc` are two different moments; a task that
/// acquired the room lock in between must see termination and treat the
/// room as gone. Nothing transitions out of `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// One occupant, waiting for a second.
    WaitingForOpponent,
    /// Both seats taken, match running.
    Active,
    /// Torn down. Every operation must treat this room as absent.
    Terminated,
}

impl RoomPhase {
    /// `true` once the room has been torn down.
    pub fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForOpponent => write!(f, "WaitingForOpponent"),
            Self::Active => write!(f, "Active"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// One match: roster, engine, outbound queues, phase.
///
/// `players` and `senders` are parallel — index i of one belongs with
/// index i of the other, and index equals seat.
pub struct Room<E> {
    room_id: RoomId,
    players: Vec<Player>,
    senders: Vec<PlayerSender>,
    engine: E,
    phase: RoomPhase,
}

impl<E: RulesEngine> Room<E> {
    /// Creates a room with the creator seated first and a fresh engine.
    pub(crate) fn new(
        room_id: RoomId,
        creator: Player,
        sender: PlayerSender,
    ) -> Self {
        Self {
            room_id,
            players: vec![creator],
            senders: vec![sender],
            engine: E::new_game(),
            phase: RoomPhase::WaitingForOpponent,
        }
    }

    /// The room's join code.
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Occupants in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// `true` if the player occupies a seat here.
    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// The occupant record for a player id, if seated.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// The occupant whose seat owns the next move.
    ///
    /// `None` when the seat to move is still vacant — a solitary creator
    /// whose opponent would be on turn.
    pub fn player_to_move(&self) -> Option<&Player> {
        self.players.get(self.engine.turn_owner().index())
    }

    /// The client-facing view of this room.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            room_id: self.room_id,
            players: self.players.clone(),
        }
    }

    /// Seats the second occupant and activates the match.
    ///
    /// Callers guard capacity first; both seats filled is a broker bug,
    /// not a client condition, by the time this runs.
    pub(crate) fn seat_opponent(
        &mut self,
        player: Player,
        sender: PlayerSender,
    ) {
        debug_assert_eq!(self.players.len(), 1);
        self.players.push(player);
        self.senders.push(sender);
        self.phase = RoomPhase::Active;
    }

    /// Forwards one move to the engine.
    pub(crate) fn apply_move(
        &mut self,
        mv: &str,
    ) -> Result<(), MoveRejected> {
        self.engine.apply_move(mv)
    }

    /// `true` once the engine reports the position terminal.
    pub fn is_terminal(&self) -> bool {
        self.engine.is_terminal()
    }

    /// Bundles the engine's final output for persistence.
    pub(crate) fn completed_game(&self) -> CompletedGame {
        CompletedGame {
            position: self.engine.position(),
            history: self.engine.history(),
            record: self.engine.record(),
        }
    }

    /// Marks the room torn down. Idempotent, one-way.
    pub(crate) fn terminate(&mut self) {
        self.phase = RoomPhase::Terminated;
    }

    /// Fans an event out to the occupants selected by `recipient`.
    ///
    /// Dead receivers are skipped silently — delivery to a live socket
    /// is the connection handler's business, not the room's.
    pub fn dispatch(&self, recipient: Recipient, event: &ServerEvent) {
        match recipient {
            Recipient::All => {
                for sender in &self.senders {
                    send_to(sender, event);
                }
            }
            Recipient::Player(target) => {
                for (player, sender) in
                    self.players.iter().zip(&self.senders)
                {
                    if player.id == target {
                        send_to(sender, event);
                    }
                }
            }
            Recipient::AllExcept(excluded) => {
                for (player, sender) in
                    self.players.iter().zip(&self.senders)
                {
                    if player.id != excluded {
                        send_to(sender, event);
                    }
                }
            }
        }
    }
}

/// Sends one event down one occupant's queue, dropping it if the
/// occupant's handler is gone.
fn send_to(sender: &PlayerSender, event: &ServerEvent) {
    let _ = sender.send(event.clone());
}

// =========================================================================
// Tests
// =========================================================================
