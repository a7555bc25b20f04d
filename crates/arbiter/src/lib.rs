//! # Arbiter
//!
//! Turn-based game session broker over WebSockets.
//!
//! Arbiter pairs two players in private rooms, enforces whose turn it
//! is, relays legal moves, and persists finished games. A game plugs in
//! through two traits: [`RulesEngine`](arbiter_room::RulesEngine) says
//! what moves mean, [`GameStore`](arbiter_room::GameStore) says where
//! finished games go. Networking, identity, and room bookkeeping are
//! the framework's problem.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arbiter::prelude::*;
//!
//! // With RulesEngine + GameStore implemented for your game:
//! // arbiter::init_tracing();
//! // let server = ArbiterServer::builder()
//! //     .bind("0.0.0.0:8080")
//! //     .build::<MyGame, _>(my_store)
//! //     .await?;
//! // server.run().await
//! ```

mod error;
mod handler;
mod server;

pub use error::ArbiterError;
pub use server::{ArbiterServer, ArbiterServerBuilder};

/// One-stop imports for embedding an Arbiter server.
pub mod prelude {
    pub use crate::{ArbiterError, ArbiterServer, ArbiterServerBuilder};

    pub use arbiter_protocol::{
        ClientEvent, Codec, JsonCodec, Player, PlayerId, Recipient, RoomId,
        RoomSnapshot, ServerEvent,
    };
    pub use arbiter_room::{
        Broker, CompletedGame, GameStore, MemoryStore, MoveRejected,
        RoomError, RulesEngine, Seat, StoreError, ILLEGAL_MOVE_NOTICE,
    };
    pub use arbiter_session::Session;
    pub use arbiter_transport::{Connection, ConnectionId, Listener};
}

/// Installs a `tracing` subscriber reading `RUST_LOG`, defaulting to
/// `info`.
///
/// Call once at startup. Embedders with their own subscriber setup can
/// skip this entirely.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
