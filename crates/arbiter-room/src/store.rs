//! Persistence hook for finished games.
//!
//! Arbiter doesn't own a database — durable storage is an external
//! collaborator behind the [`GameStore`] trait, the same way rules live
//! behind [`RulesEngine`](crate::RulesEngine). The broker calls it once
//! per occupant when a game reaches a terminal position, and that is the
//! only time it is called.
//!
//! Store failures are logged and swallowed: a database outage must not
//! keep a finished room alive or leak engine state to clients.

use arbiter_protocol::Player;

/// Everything worth keeping about a finished game.
///
/// One value is built per finished room and saved once per occupant, so
/// each player ends up with their own copy of the same game attached to
/// their own identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedGame {
    /// Final position in the engine's canonical encoding.
    pub position: String,
    /// Every accepted move, in order.
    pub history: Vec<String>,
    /// The full-game record in the engine's notation.
    pub record: String,
}

/// A save that didn't happen.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct StoreError {
    reason: String,
}

impl StoreError {
    /// Creates a store failure with a loggable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Writes one player's record of a finished game.
///
/// # Trait bounds
///
/// - `Send + Sync` — the store is shared server state, called from every
///   connection task.
/// - `'static` — it lives as long as the server and borrows nothing
///   temporary.
///
/// The method returns `impl Future` rather than being plain `async fn`
/// so the `Send` bound on the future is part of the contract —
/// implementations are free to write `async fn` as usual.
///
/// # Example
///
/// ```rust
/// use arbiter_protocol::Player;
/// use arbiter_room::{CompletedGame, GameStore, StoreError};
///
/// /// Logs games instead of persisting them. Development only.
/// struct LogStore;
///
/// impl GameStore for LogStore {
///     async fn save(
///         &self,
///         player: &Player,
///         game: &CompletedGame,
///     ) -> Result<(), StoreError> {
///         println!("{}: {} ({} moves)", player.id, game.position, game.history.len());
///         Ok(())
///     }
/// }
/// ```
pub trait GameStore: Send + Sync + 'static {
    /// Persists `game` as part of `player`'s history.
    ///
    /// Called once per occupant of a finished room, sequentially. An
    /// error here is logged by the caller; it never reaches clients and
    /// never blocks the room's teardown.
    fn save(
        &self,
        player: &Player,
        game: &CompletedGame,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Stores behind `Arc` work wherever stores do.
///
/// Tests and demos keep one handle to inspect and give the server the
/// other.
impl<S: GameStore> GameStore for std::sync::Arc<S> {
    fn save(
        &self,
        player: &Player,
        game: &CompletedGame,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send {
        (**self).save(player, game)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process [`GameStore`] holding records in a `Vec`.
///
/// This is the store the test suites and the demo server run against.
/// Nothing survives a restart, which is exactly right for both.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::sync::Mutex<Vec<(Player, CompletedGame)>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything saved so far, in save order.
    pub fn records(&self) -> Vec<(Player, CompletedGame)> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    /// Number of saved records.
    pub fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    /// `true` if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    async fn save(
        &self,
        player: &Player,
        game: &CompletedGame,
    ) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push((player.clone(), game.clone()));
        Ok(())
    }
}
