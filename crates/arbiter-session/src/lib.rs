//! Player session context for Arbiter.
//!
//! A session is the server's record of one live connection: the
//! connection-scoped [`PlayerId`](arbiter_protocol::PlayerId) plus the
//! optional display name the client has bound. That's deliberately all —
//! authentication lives in a separate credential service, and a dropped
//! connection is simply a gone player (no reconnection tokens, no grace
//! periods).
//!
//! # Where it sits
//!
//! ```text
//! Broker (above)    ← snapshots sessions into room rosters
//!     ↕
//! Session (this crate)  ← per-connection identity and display name
//!     ↕
//! Protocol (below)  ← provides PlayerId and Player
//! ```

mod session;

pub use session::Session;
