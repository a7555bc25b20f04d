//! Network layer for Arbiter.
//!
//! Provides the [`Listener`] and [`Connection`] traits that the server loop
//! is written against, plus the WebSocket implementation used in production.
//! A connection is a plain byte pipe; framing above it (JSON events) belongs
//! to `arbiter-protocol`.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket listener via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketListener};

use std::fmt;

/// Opaque identifier for a live connection.
///
/// Allocated once per accepted connection and never reused within a process.
/// The layers above derive player identity from it, so two connections from
/// the same person are two different players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Unwraps back to the raw value, for layers that key on it.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Produces inbound connections for the accept loop.
pub trait Listener: Send + Sync + 'static {
    /// Concrete connection type handed out by [`Listener::accept`].
    type Connection: Connection;
    /// Error type for listener operations.
    type Error: std::error::Error + Send + Sync;

    /// Blocks until the next client connects and the handshake completes.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting new connections. Existing connections keep running.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// A single connection that can send and receive byte messages.
///
/// All methods take `&self` so one task can race `recv()` against an
/// outbound queue in a `select!` loop and still call `send()` from the
/// winning branch.
pub trait Connection: Send + Sync + 'static {
    /// Error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Delivers one message to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Awaits the next inbound message.
    ///
    /// A clean close from the peer surfaces as `Ok(None)`.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Performs a graceful close.
    async fn close(&self) -> Result<(), Self::Error>;

    /// The id allocated to this connection at accept time.
    fn id(&self) -> ConnectionId;
}
