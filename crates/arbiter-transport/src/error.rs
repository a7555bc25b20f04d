/// Errors that can occur in the network layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("bind failed: {0}")]
    BindFailed(#[source] std::io::Error),

    /// Accepting or upgrading an incoming connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// An outbound frame could not be written.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// An inbound frame could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),
}
