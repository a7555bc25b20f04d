//! Room brokering for Arbiter.
//!
//! This crate is the server's core: it registers rooms, seats players,
//! enforces whose turn it is, relays legal moves, and tears rooms down
//! when a game ends, a rule is broken, or a player walks away. What the
//! moves *mean* is delegated to a [`RulesEngine`]; where finished games
//! *go* is delegated to a [`GameStore`]. Arbiter ships neither — the
//! embedding application provides both.
//!
//! # Key types
//!
//! - [`RulesEngine`] — the trait game developers implement
//! - [`GameStore`] — persistence seam for finished games
//! - [`Broker`] — create/join/move/disconnect/close, the whole surface
//! - [`Registry`] — id allocation and the id → room map
//! - [`Room`] — one match: roster, engine, outbound queues

mod broker;
mod error;
mod registry;
mod room;
mod rules;
mod store;

pub use broker::{Broker, ILLEGAL_MOVE_NOTICE};
pub use error::RoomError;
pub use registry::{Registry, SharedRoom};
pub use room::{PlayerSender, Room, RoomPhase};
pub use rules::{MoveRejected, RulesEngine, Seat};
pub use store::{CompletedGame, GameStore, MemoryStore, StoreError};
