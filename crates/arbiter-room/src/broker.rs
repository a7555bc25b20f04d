//! The broker: every room operation enters here.
//!
//! One broker instance serves the whole process. It owns the
//! [`Registry`] and the game store, and exposes the five operations the
//! connection layer drives: create, join, move, disconnect, close.
//!
//! # What gets an answer and what doesn't
//!
//! Join failures are client conditions — the joiner typed a bad code or
//! raced someone for the last seat — so `join_room` returns an error the
//! caller reports back. Move traffic is different: a move from the wrong
//! player or for a dead room is dropped without a reply, because
//! answering would hand a probe tool to exactly the clients that
//! shouldn't have one. An illegal move from the player *on turn* is the
//! one move failure that talks back, and it talks to the whole room.

use arbiter_protocol::{
    Player, PlayerId, Recipient, RoomId, RoomSnapshot, ServerEvent,
};

use crate::{
    GameStore, PlayerSender, Registry, Room, RoomError, RulesEngine,
};

/// Room-wide notice sent when an occupant on turn submits a move the
/// rules reject. Fixed wording; the rejection detail stays in the logs.
pub const ILLEGAL_MOVE_NOTICE: &str =
    "Illegal move detected. Room will be closed.";

/// The session broker. Generic over the rules engine `E` and the
/// persistence backend `S`.
pub struct Broker<E, S> {
    registry: Registry<E>,
    store: S,
}

impl<E: RulesEngine, S: GameStore> Broker<E, S> {
    pub fn new(store: S) -> Self {
        Self {
            registry: Registry::new(),
            store,
        }
    }

    /// The persistence backend this broker saves finished games to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of rooms currently registered.
    pub fn room_count(&self) -> usize {
        self.registry.len()
    }

    /// Creates a room with `creator` in the first seat and returns its
    /// join code.
    pub fn create_room(
        &self,
        creator: Player,
        sender: PlayerSender,
    ) -> RoomId {
        let creator_id = creator.id;
        let room_id = self.registry.create(creator, sender);
        tracing::info!(%room_id, player_id = %creator_id, "room created");
        room_id
    }

    /// Seats `joiner` in the room's second seat.
    ///
    /// On success the returned snapshot already includes the joiner, and
    /// the occupants who were already seated have been told about the
    /// arrival. The joiner learns the roster from the return value, not
    /// from an event.
    pub async fn join_room(
        &self,
        joiner: Player,
        sender: PlayerSender,
        room_id: RoomId,
    ) -> Result<RoomSnapshot, RoomError> {
        let Some(handle) = self.registry.get(room_id) else {
            return Err(RoomError::NotFound);
        };
        let mut room = handle.lock().await;
        if room.phase().is_terminated() {
            return Err(RoomError::NotFound);
        }
        match room.players().len() {
            0 => Err(RoomError::Empty),
            1 => {
                let joiner_id = joiner.id;
                room.seat_opponent(joiner, sender);
                let snapshot = room.snapshot();
                room.dispatch(
                    Recipient::AllExcept(joiner_id),
                    &ServerEvent::OpponentJoined {
                        room: snapshot.clone(),
                    },
                );
                tracing::info!(
                    %room_id,
                    player_id = %joiner_id,
                    "player joined room"
                );
                Ok(snapshot)
            }
            _ => Err(RoomError::Full),
        }
    }

    /// Relays one move through the room's rules engine.
    ///
    /// Silently ignored when the room is unknown or the requester's seat
    /// doesn't own the turn. A rejected move from the player on turn
    /// tears the room down; a move that finishes the game persists it
    /// and tears the room down.
    pub async fn submit_move(
        &self,
        requester: PlayerId,
        room_id: RoomId,
        mv: &str,
    ) {
        let Some(handle) = self.registry.get(room_id) else {
            tracing::debug!(
                %room_id,
                player_id = %requester,
                "move for unknown room ignored"
            );
            return;
        };
        let mut room = handle.lock().await;
        if room.phase().is_terminated() {
            tracing::debug!(
                %room_id,
                player_id = %requester,
                "move for terminated room ignored"
            );
            return;
        }
        if room.player_to_move().map(|p| p.id) != Some(requester) {
            tracing::debug!(
                %room_id,
                player_id = %requester,
                "out-of-turn move ignored"
            );
            return;
        }

        if let Err(rejection) = room.apply_move(mv) {
            tracing::info!(
                %room_id,
                player_id = %requester,
                reason = %rejection,
                "illegal move, closing room"
            );
            room.dispatch(
                Recipient::All,
                &ServerEvent::IllegalMove {
                    message: ILLEGAL_MOVE_NOTICE.to_string(),
                },
            );
            room.terminate();
            self.registry.remove(room_id);
            return;
        }

        room.dispatch(
            Recipient::AllExcept(requester),
            &ServerEvent::Move { mv: mv.to_string() },
        );

        if room.is_terminal() {
            self.finish_game(room_id, &mut room).await;
            self.registry.remove(room_id);
        }
    }

    /// Announces the final position, saves one record per occupant, and
    /// terminates the room.
    ///
    /// Store failures are logged and skipped — the game already ended on
    /// the board, and the occupants were already told, so a flaky
    /// backend must not wedge the room in the registry.
    async fn finish_game(&self, room_id: RoomId, room: &mut Room<E>) {
        let game = room.completed_game();
        room.dispatch(
            Recipient::All,
            &ServerEvent::GameOver {
                position: game.position.clone(),
            },
        );
        for player in room.players() {
            if let Err(err) = self.store.save(player, &game).await {
                tracing::error!(
                    %room_id,
                    player_id = %player.id,
                    error = %err,
                    "failed to save finished game"
                );
            }
        }
        room.terminate();
        tracing::info!(%room_id, "game over, room closed");
    }

    /// Reacts to a player's connection going away.
    ///
    /// A solitary creator's room is deleted outright. In a two-player
    /// room the survivor is notified and the room stays registered.
    pub async fn handle_disconnect(&self, player_id: PlayerId) {
        for (room_id, handle) in self.registry.rooms() {
            let mut room = handle.lock().await;
            if room.phase().is_terminated() {
                continue;
            }
            let Some(departed) = room.player(player_id).cloned() else {
                continue;
            };

            if room.players().len() < 2 {
                room.terminate();
                self.registry.remove(room_id);
                tracing::info!(
                    %room_id,
                    player_id = %player_id,
                    "creator disconnected, room removed"
                );
            } else {
                // TODO: the survivor's room stays registered with a dead
                // seat; it needs a vacate-or-close step so the survivor
                // isn't stranded in an unjoinable room.
                room.dispatch(
                    Recipient::AllExcept(player_id),
                    &ServerEvent::PlayerDisconnected { player: departed },
                );
                tracing::info!(
                    %room_id,
                    player_id = %player_id,
                    "player disconnected, opponents notified"
                );
            }
            // A player occupies at most one room.
            return;
        }
    }

    /// Closes a room on request: the other occupants are told, then the
    /// room is deleted. Unknown ids are ignored.
    pub async fn close_room(&self, requester: PlayerId, room_id: RoomId) {
        let Some(handle) = self.registry.get(room_id) else {
            tracing::debug!(
                %room_id,
                player_id = %requester,
                "close for unknown room ignored"
            );
            return;
        };
        let mut room = handle.lock().await;
        if room.phase().is_terminated() {
            return;
        }
        room.dispatch(
            Recipient::AllExcept(requester),
            &ServerEvent::CloseRoom { room_id },
        );
        room.terminate();
        self.registry.remove(room_id);
        tracing::info!(
            %room_id,
            player_id = %requester,
            "room closed on request"
        );
    }

    /// Client-facing view of a room, if it exists.
    pub async fn snapshot(&self, room_id: RoomId) -> Option<RoomSnapshot> {
        let handle = self.registry.get(room_id)?;
        let room = handle.lock().await;
        if room.phase().is_terminated() {
            return None;
        }
        Some(room.snapshot())
    }
}
