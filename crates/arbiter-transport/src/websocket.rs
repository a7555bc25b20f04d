//! WebSocket listener and connection using `tokio-tungstenite`.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Listener, TransportError};

/// Source of connection ids, shared by every listener in the process.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_connection_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

// Tungstenite errors carry no io kind of their own; these pick the
// closest one so the error enum can stay io-based throughout.

fn upgrade_failed(err: WsError) -> TransportError {
    TransportError::AcceptFailed(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        err,
    ))
}

fn send_failed(err: WsError) -> TransportError {
    TransportError::SendFailed(io::Error::new(io::ErrorKind::BrokenPipe, err))
}

fn recv_failed(err: WsError) -> TransportError {
    TransportError::ReceiveFailed(io::Error::new(
        io::ErrorKind::ConnectionReset,
        err,
    ))
}

/// A WebSocket [`Listener`] on a TCP socket.
pub struct WebSocketListener {
    listener: TcpListener,
}

impl WebSocketListener {
    /// Binds a new WebSocket listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::BindFailed)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// Returns the address the listener is actually bound to.
    ///
    /// Binding to port 0 picks a free port; this is how callers find it.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Listener for WebSocketListener {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(upgrade_failed)?;

        let id = next_connection_id();
        tracing::debug!(%id, %peer, "accepted WebSocket connection");
        Ok(WebSocketConnection {
            id,
            ws: Arc::new(Mutex::new(ws)),
        })
    }

    async fn shutdown(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// One accepted WebSocket connection.
///
/// Text and binary frames are both delivered as bytes from `recv()`;
/// browser clients tend to send text, native clients binary.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: Arc<Mutex<WebSocketStream<TcpStream>>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        // Outbound frames are text: the payload is always UTF-8 JSON and
        // browsers hand text frames straight to `JSON.parse`.
        let frame = Message::Text(
            String::from_utf8_lossy(data).into_owned().into(),
        );
        self.ws.lock().await.send(frame).await.map_err(send_failed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        loop {
            let frame = match self.ws.lock().await.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(recv_failed(e)),
                Some(Ok(frame)) => frame,
            };
            match frame {
                Message::Text(text) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Message::Binary(data) => return Ok(Some(data.into())),
                Message::Close(_) => return Ok(None),
                // Ping and pong are answered by tungstenite itself.
                _ => {}
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.ws.lock().await.close(None).await.map_err(send_failed)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
