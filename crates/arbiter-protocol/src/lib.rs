//! Wire protocol for Arbiter.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Player`],
//!   [`RoomSnapshot`], the id newtypes) — the structures that travel on
//!   the wire, plus [`Recipient`], the server-internal delivery scope.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing that.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the broker
//! (rooms and turns). It knows nothing about connections or game rules —
//! only about shapes.
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Broker (rooms, turns)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Player, PlayerId, Recipient, RoomId, RoomSnapshot,
    ServerEvent,
};
