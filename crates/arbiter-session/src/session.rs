//! Session types: the server's record of one connected player.
//!
//! A session is created the moment a connection is accepted and dropped
//! the moment it ends — identity here is connection-scoped, not
//! account-scoped. The only mutable piece is the display name, which the
//! client may bind (and re-bind) at any time with a `username` event.

use arbiter_protocol::{Player, PlayerId};

/// Display names longer than this are truncated, not rejected.
const MAX_USERNAME_CHARS: usize = 32;

/// A single connection's session context.
///
/// Handlers receive this by reference alongside each decoded event, so
/// "who is acting, under what name" is always explicit in signatures
/// instead of being smuggled through ad-hoc fields on the connection.
#[derive(Debug, Clone)]
pub struct Session {
    player_id: PlayerId,
    username: Option<String>,
}

impl Session {
    /// Creates a fresh session for a newly accepted connection.
    ///
    /// No name is bound yet; an anonymous session is a normal state,
    /// not an error.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            username: None,
        }
    }

    /// The connection-scoped player identity.
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// The currently bound display name, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Binds or replaces the display name.
    ///
    /// The raw value is trimmed; if nothing is left, the name is cleared
    /// rather than stored empty. Oversized names are cut at a char
    /// boundary so multi-byte input can't panic the slice.
    ///
    /// Room rosters snapshot the name at create/join time, so re-binding
    /// affects only future room operations.
    pub fn set_username(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.username = None;
            tracing::debug!(player_id = %self.player_id, "display name cleared");
            return;
        }

        let name = match trimmed.char_indices().nth(MAX_USERNAME_CHARS) {
            Some((cut, _)) => &trimmed[..cut],
            None => trimmed,
        };
        tracing::debug!(
            player_id = %self.player_id,
            username = name,
            "display name bound"
        );
        self.username = Some(name.to_string());
    }

    /// Snapshots this session as a room-facing [`Player`].
    ///
    /// Called at the moment of a create/join; the returned record keeps
    /// whatever name was bound right then.
    pub fn player(&self) -> Player {
        Player {
            id: self.player_id,
            username: self.username.clone(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
