//! Per-connection handler: decode, dispatch, deliver.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. One loop serves both directions: inbound frames are decoded
//! and handed to the broker, and events the broker queues for this
//! player are drained and written back to the socket. The loop is the
//! only task touching the connection, so there is no reader/writer
//! split to coordinate.
//!
//! Identity is connection-scoped: the player id is minted from the
//! connection id, and everything the player is — display name, seat,
//! room — dies with the socket.

use std::sync::Arc;

use arbiter_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use arbiter_room::{GameStore, PlayerSender, RulesEngine};
use arbiter_session::Session;
use arbiter_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::ArbiterError;

/// Drives one connection from accept to teardown.
///
/// Whatever way the loop ends — clean close, transport error, encode
/// failure — the broker is told about the departure exactly once before
/// this returns.
pub(crate) async fn handle_connection<E, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<E, S, C>>,
) -> Result<(), ArbiterError>
where
    E: RulesEngine,
    S: GameStore,
    C: Codec,
{
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::debug!(%conn_id, %player_id, "connection open");

    let result = connection_loop(&conn, &state, player_id).await;
    state.broker.handle_disconnect(player_id).await;
    result
}

/// The select loop: inbound frames vs. queued outbound events.
async fn connection_loop<E, S, C>(
    conn: &WebSocketConnection,
    state: &ServerState<E, S, C>,
    player_id: PlayerId,
) -> Result<(), ArbiterError>
where
    E: RulesEngine,
    S: GameStore,
    C: Codec,
{
    let mut session = Session::new(player_id);
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        tokio::select! {
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed");
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        return Err(e.into());
                    }
                };

                let event: ClientEvent = match state.codec.decode(&data) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(
                            %player_id,
                            error = %e,
                            "undecodable client event ignored"
                        );
                        continue;
                    }
                };

                handle_client_event(state, &mut session, &tx, event).await;
            }
            outbound = rx.recv() => {
                // The loop owns `tx`, so the channel cannot be closed.
                let Some(event) = outbound else { return Ok(()) };
                let bytes = state.codec.encode(&event)?;
                conn.send(&bytes).await.map_err(ArbiterError::Transport)?;
            }
        }
    }
}

/// Dispatches one decoded client event.
///
/// Direct replies (`roomCreated`, `roomJoined`, `error`) go through the
/// player's own outbound queue rather than straight to the socket, so
/// they interleave correctly with events the broker fans in from other
/// players.
async fn handle_client_event<E, S, C>(
    state: &ServerState<E, S, C>,
    session: &mut Session,
    tx: &PlayerSender,
    event: ClientEvent,
) where
    E: RulesEngine,
    S: GameStore,
    C: Codec,
{
    match event {
        ClientEvent::Username { username } => {
            session.set_username(&username);
        }

        ClientEvent::CreateRoom => {
            let room_id =
                state.broker.create_room(session.player(), tx.clone());
            reply(tx, ServerEvent::RoomCreated { room_id });
        }

        ClientEvent::JoinRoom { room_id } => {
            match state
                .broker
                .join_room(session.player(), tx.clone(), room_id)
                .await
            {
                Ok(room) => reply(tx, ServerEvent::RoomJoined { room }),
                Err(e) => reply(
                    tx,
                    ServerEvent::Error {
                        message: e.to_string(),
                    },
                ),
            }
        }

        ClientEvent::Move { room, mv } => {
            state
                .broker
                .submit_move(session.player_id(), room, &mv)
                .await;
        }

        ClientEvent::CloseRoom { room_id } => {
            state
                .broker
                .close_room(session.player_id(), room_id)
                .await;
        }
    }
}

/// Queues a direct reply onto this player's own outbound channel.
fn reply(tx: &PlayerSender, event: ServerEvent) {
    let _ = tx.send(event);
}
