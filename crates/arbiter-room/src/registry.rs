//! The room registry: id allocation and the id → room map.
//!
//! # Lock contract
//!
//! Two lock kinds live in this crate and they must not be confused:
//!
//! - The **map lock** here is a `std::sync::Mutex`. It guards only the
//!   `HashMap` itself and is never held across an `.await`. Every method
//!   takes it, touches the map, and releases it before returning.
//! - Each **room lock** is a `tokio::sync::Mutex` around one [`Room`].
//!   Callers hold it across the whole read-modify-write of a room,
//!   `.await`s included.
//!
//! Ordering: the map lock is never taken while waiting on a room lock,
//! but a caller holding a room lock MAY take the map lock briefly (to
//! remove the room it holds). That single direction keeps the pair
//! deadlock-free.
//!
//! Removal and teardown are separate steps. A task may clone a room's
//! `Arc` out of the map just before another task removes it; the
//! [`RoomPhase::Terminated`](crate::RoomPhase::Terminated) tombstone is
//! what makes the stale handle harmless.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use arbiter_protocol::{Player, RoomId};
use rand::Rng;

use crate::{PlayerSender, Room, RulesEngine};

/// A registered room behind its own lock.
pub type SharedRoom<E> = Arc<tokio::sync::Mutex<Room<E>>>;

/// All live rooms, keyed by join code.
pub struct Registry<E> {
    rooms: Mutex<HashMap<RoomId, SharedRoom<E>>>,
}

impl<E: RulesEngine> Registry<E> {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    fn rooms_guard(&self) -> MutexGuard<'_, HashMap<RoomId, SharedRoom<E>>> {
        self.rooms.lock().expect("registry mutex poisoned")
    }

    /// Creates a room seating `creator` and registers it under a fresh
    /// random id.
    ///
    /// Ids are drawn from the full 128-bit space, so a collision means
    /// the RNG is broken rather than the space exhausted — but the loop
    /// costs nothing and refuses to clobber a live room even then.
    pub fn create(&self, creator: Player, sender: PlayerSender) -> RoomId {
        let mut guard = self.rooms_guard();
        let room_id = loop {
            let candidate = RoomId(rand::rng().random::<u128>());
            if !guard.contains_key(&candidate) {
                break candidate;
            }
        };
        let room = Room::new(room_id, creator, sender);
        guard.insert(room_id, Arc::new(tokio::sync::Mutex::new(room)));
        room_id
    }

    /// Looks up a room by id, cloning the handle out of the map.
    pub fn get(&self, room_id: RoomId) -> Option<SharedRoom<E>> {
        self.rooms_guard().get(&room_id).cloned()
    }

    /// Drops a room from the map. Idempotent; returns whether the id was
    /// present.
    pub fn remove(&self, room_id: RoomId) -> bool {
        self.rooms_guard().remove(&room_id).is_some()
    }

    /// Snapshot of every registered room.
    ///
    /// The disconnect sweep iterates this instead of the map itself so
    /// no map lock is held while room locks are awaited.
    pub fn rooms(&self) -> Vec<(RoomId, SharedRoom<E>)> {
        self.rooms_guard()
            .iter()
            .map(|(id, room)| (*id, Arc::clone(room)))
            .collect()
    }

    /// Number of registered rooms.
    pub fn len(&self) -> usize {
        self.rooms_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms_guard().is_empty()
    }
}

impl<E: RulesEngine> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
