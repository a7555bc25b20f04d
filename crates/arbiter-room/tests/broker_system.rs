//! Integration tests for the broker using a mock rules engine.

use arbiter_protocol::{Player, PlayerId, RoomId, ServerEvent};
use arbiter_room::{
    Broker, CompletedGame, GameStore, MemoryStore, MoveRejected, PlayerSender,
    RoomError, RulesEngine, Seat, StoreError, ILLEGAL_MOVE_NOTICE,
};
use tokio::sync::mpsc;

// =========================================================================
// Mock game: a countdown from 4. A move takes 1 or 2; whoever takes the
// last unit ends the game. Anything else is illegal.
// =========================================================================

struct Countdown {
    remaining: u32,
    moves: Vec<String>,
}

impl RulesEngine for Countdown {
    fn new_game() -> Self {
        Self {
            remaining: 4,
            moves: Vec::new(),
        }
    }

    fn apply_move(&mut self, mv: &str) -> Result<(), MoveRejected> {
        let take: u32 = mv
            .parse()
            .map_err(|_| MoveRejected::new(format!("not a number: {mv}")))?;
        if !(1..=2).contains(&take) {
            return Err(MoveRejected::new("take 1 or 2"));
        }
        if take > self.remaining {
            return Err(MoveRejected::new("not that many left"));
        }
        self.remaining -= take;
        self.moves.push(mv.to_string());
        Ok(())
    }

    fn turn_owner(&self) -> Seat {
        if self.moves.len() % 2 == 0 {
            Seat::First
        } else {
            Seat::Second
        }
    }

    fn is_terminal(&self) -> bool {
        self.remaining == 0
    }

    fn position(&self) -> String {
        format!("{} left", self.remaining)
    }

    fn record(&self) -> String {
        self.moves.join(" ")
    }

    fn history(&self) -> Vec<String> {
        self.moves.clone()
    }
}

/// A store whose every save fails, for the teardown-anyway path.
struct FailingStore;

impl GameStore for FailingStore {
    async fn save(
        &self,
        _player: &Player,
        _game: &CompletedGame,
    ) -> Result<(), StoreError> {
        Err(StoreError::new("backend offline"))
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn player(id: u64, name: &str) -> Player {
    Player {
        id: PlayerId(id),
        username: Some(name.to_string()),
    }
}

fn channel() -> (PlayerSender, mpsc::UnboundedReceiver<ServerEvent>) {
    mpsc::unbounded_channel()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

/// Creates a room for ana, joins ben, and drains both queues so tests
/// start from a quiet two-player room.
async fn active_room<S: GameStore>(
    broker: &Broker<Countdown, S>,
) -> (
    RoomId,
    mpsc::UnboundedReceiver<ServerEvent>,
    mpsc::UnboundedReceiver<ServerEvent>,
) {
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    let room_id = broker.create_room(player(1, "ana"), tx1);
    broker
        .join_room(player(2, "ben"), tx2, room_id)
        .await
        .unwrap();
    drain(&mut rx1);
    drain(&mut rx2);
    (room_id, rx1, rx2)
}

// =========================================================================
// Create and join
// =========================================================================

#[tokio::test]
async fn test_create_room_registers_and_snapshots_creator() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (tx, _rx) = channel();

    let room_id = broker.create_room(player(1, "ana"), tx);

    assert_eq!(broker.room_count(), 1);
    let snap = broker.snapshot(room_id).await.unwrap();
    assert_eq!(snap.room_id, room_id);
    assert_eq!(snap.players.len(), 1);
    assert_eq!(snap.players[0].username.as_deref(), Some("ana"));
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (tx, _rx) = channel();

    let result = broker
        .join_room(player(2, "ben"), tx, RoomId(0xbad))
        .await;

    assert_eq!(result.unwrap_err(), RoomError::NotFound);
}

#[tokio::test]
async fn test_join_full_room_is_rejected() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, _rx1, _rx2) = active_room(&broker).await;
    let (tx3, mut rx3) = channel();

    let result = broker.join_room(player(3, "cleo"), tx3, room_id).await;

    assert_eq!(result.unwrap_err(), RoomError::Full);
    // The intruder's queue stays empty; the room never saw them.
    assert!(drain(&mut rx3).is_empty());
}

#[tokio::test]
async fn test_join_notifies_creator_but_not_joiner() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (tx1, mut rx1) = channel();
    let (tx2, mut rx2) = channel();
    let room_id = broker.create_room(player(1, "ana"), tx1);

    let snap = broker
        .join_room(player(2, "ben"), tx2, room_id)
        .await
        .unwrap();

    // The joiner learns the roster from the return value.
    assert_eq!(snap.players.len(), 2);
    assert_eq!(snap.players[0].username.as_deref(), Some("ana"));
    assert_eq!(snap.players[1].username.as_deref(), Some("ben"));
    assert!(drain(&mut rx2).is_empty());

    // The creator learns it from the event.
    let events = drain(&mut rx1);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::OpponentJoined { room } => {
            assert_eq!(room.players.len(), 2);
            assert_eq!(room.players[1].username.as_deref(), Some("ben"));
        }
        other => panic!("expected opponentJoined, got {other:?}"),
    }
}

// =========================================================================
// Move relay and turn enforcement
// =========================================================================

#[tokio::test]
async fn test_creator_moves_first_and_move_reaches_opponent_only() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), room_id, "1").await;

    assert!(drain(&mut rx1).is_empty(), "mover must not echo itself");
    assert_eq!(
        drain(&mut rx2),
        vec![ServerEvent::Move { mv: "1".into() }]
    );
}

#[tokio::test]
async fn test_out_of_turn_move_is_silently_dropped() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    // Ben moves before ana has played.
    broker.submit_move(PlayerId(2), room_id, "1").await;

    assert!(drain(&mut rx1).is_empty());
    assert!(drain(&mut rx2).is_empty());
    assert_eq!(broker.room_count(), 1, "room must survive the attempt");
}

#[tokio::test]
async fn test_turns_alternate_after_each_legal_move() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), room_id, "1").await;
    broker.submit_move(PlayerId(2), room_id, "1").await;

    assert_eq!(
        drain(&mut rx1),
        vec![ServerEvent::Move { mv: "1".into() }]
    );
    assert_eq!(
        drain(&mut rx2),
        vec![ServerEvent::Move { mv: "1".into() }]
    );
}

#[tokio::test]
async fn test_move_for_unknown_room_is_ignored() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (_room_id, mut rx1, _rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), RoomId(0xbad), "1").await;

    assert!(drain(&mut rx1).is_empty());
    assert_eq!(broker.room_count(), 1);
}

#[tokio::test]
async fn test_solitary_creator_may_open_but_not_move_twice() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (tx1, mut rx1) = channel();
    let room_id = broker.create_room(player(1, "ana"), tx1);

    // The opening move goes through even with the second seat vacant.
    broker.submit_move(PlayerId(1), room_id, "1").await;
    assert_eq!(broker.room_count(), 1);

    // But the reply seat is vacant, so ana cannot keep moving.
    broker.submit_move(PlayerId(1), room_id, "1").await;
    assert!(drain(&mut rx1).is_empty());
    assert_eq!(broker.room_count(), 1);
}

// =========================================================================
// Illegal moves
// =========================================================================

#[tokio::test]
async fn test_illegal_move_notifies_everyone_and_deletes_room() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), room_id, "seven").await;

    let expected = ServerEvent::IllegalMove {
        message: ILLEGAL_MOVE_NOTICE.to_string(),
    };
    assert_eq!(drain(&mut rx1), vec![expected.clone()]);
    assert_eq!(drain(&mut rx2), vec![expected]);
    assert_eq!(broker.room_count(), 0);

    // The code is dead: a later join sees no trace of the room.
    let (tx3, _rx3) = channel();
    let result = broker.join_room(player(3, "cleo"), tx3, room_id).await;
    assert_eq!(result.unwrap_err(), RoomError::NotFound);
}

#[tokio::test]
async fn test_overdraw_counts_as_illegal() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, _rx1, _rx2) = active_room(&broker).await;

    // Take 1, take 2: one unit left. Taking 2 now is an overdraw.
    broker.submit_move(PlayerId(1), room_id, "1").await;
    broker.submit_move(PlayerId(2), room_id, "2").await;
    broker.submit_move(PlayerId(1), room_id, "2").await;

    assert_eq!(broker.room_count(), 0);
}

// =========================================================================
// Game over and persistence
// =========================================================================

#[tokio::test]
async fn test_finishing_move_announces_and_persists_for_both() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), room_id, "2").await;
    broker.submit_move(PlayerId(2), room_id, "2").await;

    // Each queue holds the opponent's move and then the shared result;
    // nobody's own move comes back to them.
    assert_eq!(
        drain(&mut rx1),
        vec![
            ServerEvent::Move { mv: "2".into() },
            ServerEvent::GameOver {
                position: "0 left".into()
            },
        ]
    );
    assert_eq!(
        drain(&mut rx2),
        vec![
            ServerEvent::Move { mv: "2".into() },
            ServerEvent::GameOver {
                position: "0 left".into()
            },
        ]
    );

    // One record per occupant, in seat order.
    let records = broker.store().records();
    assert_eq!(records.len(), 2);
    let (ref ana, ref game) = records[0];
    assert_eq!(ana.username.as_deref(), Some("ana"));
    assert_eq!(game.position, "0 left");
    assert_eq!(game.record, "2 2");
    assert_eq!(game.history, vec!["2".to_string(), "2".to_string()]);
    let (ref ben, _) = records[1];
    assert_eq!(ben.username.as_deref(), Some("ben"));

    // The room is gone.
    assert_eq!(broker.room_count(), 0);
    assert!(broker.snapshot(room_id).await.is_none());
}

#[tokio::test]
async fn test_store_failure_still_tears_the_room_down() {
    let broker = Broker::<Countdown, _>::new(FailingStore);
    let (room_id, mut rx1, _rx2) = active_room(&broker).await;

    broker.submit_move(PlayerId(1), room_id, "2").await;
    broker.submit_move(PlayerId(2), room_id, "2").await;

    // The result still reaches the room even though nothing was saved.
    let events = drain(&mut rx1);
    assert!(events
        .iter()
        .any(|ev| matches!(ev, ServerEvent::GameOver { .. })));
    assert_eq!(broker.room_count(), 0);
    assert!(broker.snapshot(room_id).await.is_none());
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_solitary_disconnect_removes_room_silently() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (tx1, _rx1) = channel();
    let room_id = broker.create_room(player(1, "ana"), tx1);

    broker.handle_disconnect(PlayerId(1)).await;

    assert_eq!(broker.room_count(), 0);
    assert!(broker.snapshot(room_id).await.is_none());
}

#[tokio::test]
async fn test_two_player_disconnect_notifies_survivor_only() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (_room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.handle_disconnect(PlayerId(2)).await;

    let events = drain(&mut rx1);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::PlayerDisconnected { player } => {
            assert_eq!(player.id, PlayerId(2));
            assert_eq!(player.username.as_deref(), Some("ben"));
        }
        other => panic!("expected playerDisconnected, got {other:?}"),
    }
    assert!(drain(&mut rx2).is_empty());

    // The room stays registered for the survivor.
    assert_eq!(broker.room_count(), 1);
}

#[tokio::test]
async fn test_disconnect_of_unknown_player_is_harmless() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (_room_id, mut rx1, _rx2) = active_room(&broker).await;

    broker.handle_disconnect(PlayerId(999)).await;

    assert!(drain(&mut rx1).is_empty());
    assert_eq!(broker.room_count(), 1);
}

// =========================================================================
// Close on request
// =========================================================================

#[tokio::test]
async fn test_close_room_notifies_others_and_removes() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.close_room(PlayerId(2), room_id).await;

    assert_eq!(
        drain(&mut rx1),
        vec![ServerEvent::CloseRoom { room_id }]
    );
    assert!(drain(&mut rx2).is_empty(), "closer gets no echo");
    assert_eq!(broker.room_count(), 0);
}

#[tokio::test]
async fn test_close_unknown_room_is_ignored() {
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (_room_id, _rx1, _rx2) = active_room(&broker).await;

    broker.close_room(PlayerId(1), RoomId(0xbad)).await;

    assert_eq!(broker.room_count(), 1);
}

#[tokio::test]
async fn test_close_by_outsider_still_closes() {
    // Close is keyed by room id alone; whoever holds the code can use
    // it. Both occupants are notified since the closer isn't seated.
    let broker = Broker::<Countdown, _>::new(MemoryStore::new());
    let (room_id, mut rx1, mut rx2) = active_room(&broker).await;

    broker.close_room(PlayerId(999), room_id).await;

    assert_eq!(
        drain(&mut rx1),
        vec![ServerEvent::CloseRoom { room_id }]
    );
    assert_eq!(
        drain(&mut rx2),
        vec![ServerEvent::CloseRoom { room_id }]
    );
    assert_eq!(broker.room_count(), 0);
}
