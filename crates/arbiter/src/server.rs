//! Server assembly: builder, shared state, accept loop.
//!
//! Everything a running Arbiter server needs is put together here: the
//! WebSocket listener, the broker with its store, and the codec, behind
//! a small builder. Each accepted connection is handed to its own task
//! running the connection handler.

use std::net::SocketAddr;
use std::sync::Arc;

use arbiter_protocol::{Codec, JsonCodec};
use arbiter_room::{Broker, GameStore, RulesEngine};
use arbiter_transport::{Listener, WebSocketListener};

use crate::ArbiterError;
use crate::handler::handle_connection;

/// Address used when the builder isn't told otherwise.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// State shared by every connection task.
///
/// Cloned around as an `Arc`. No outer mutex: the broker serializes room
/// access internally and the codec is stateless.
pub(crate) struct ServerState<E: RulesEngine, S: GameStore, C: Codec> {
    pub(crate) broker: Broker<E, S>,
    pub(crate) codec: C,
}

/// Configures and builds an [`ArbiterServer`].
///
/// # Example
///
/// ```rust,ignore
/// use arbiter::prelude::*;
///
/// let server = ArbiterServer::builder()
///     .bind("0.0.0.0:8080")
///     .build::<MyGame, _>(my_store)
///     .await?;
/// server.run().await
/// ```
pub struct ArbiterServerBuilder {
    bind_addr: String,
}

impl ArbiterServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }

    /// Address to listen on, `host:port`.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server around `store`.
    ///
    /// The rules engine type comes from the caller's turbofish; codec
    /// and transport are fixed to JSON over WebSockets.
    pub async fn build<E: RulesEngine, S: GameStore>(
        self,
        store: S,
    ) -> Result<ArbiterServer<E, S, JsonCodec>, ArbiterError> {
        let listener = WebSocketListener::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            broker: Broker::new(store),
            codec: JsonCodec,
        });
        Ok(ArbiterServer { listener, state })
    }
}

impl Default for ArbiterServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Arbiter server, ready to accept connections.
pub struct ArbiterServer<E: RulesEngine, S: GameStore, C: Codec> {
    listener: WebSocketListener,
    state: Arc<ServerState<E, S, C>>,
}

impl<E, S, C> ArbiterServer<E, S, C>
where
    E: RulesEngine,
    S: GameStore,
    C: Codec,
{
    /// Shorthand for [`ArbiterServerBuilder::new`].
    pub fn builder() -> ArbiterServerBuilder {
        ArbiterServerBuilder::new()
    }

    /// The address the listener actually bound. How tests binding port 0
    /// find their port.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process is terminated.
    ///
    /// Every accepted connection gets its own handler task; a failed
    /// accept is logged and the loop keeps going.
    pub async fn run(mut self) -> Result<(), ArbiterError> {
        tracing::info!("arbiter server accepting connections");

        loop {
            let conn = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::error!(error = %e, "listener accept failed");
                    continue;
                }
            };
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                if let Err(e) =
                    handle_connection::<E, S, C>(conn, state).await
                {
                    tracing::debug!(
                        error = %e,
                        "connection handler ended with error"
                    );
                }
            });
        }
    }
}
