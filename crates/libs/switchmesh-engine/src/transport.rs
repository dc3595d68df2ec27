/// Transport-level send failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The radio is busy; the frame was not queued.
    #[error("transport busy")]
    Busy,

    #[error("transport failure: {0}")]
    Failure(String),
}

/// Outbound side of the mesh radio.
///
/// Inbound delivery is the reverse call: the transport hands every received
/// `(channel, bytes)` pair to [`MeshControl::on_receive`](crate::MeshControl::on_receive).
pub trait MeshTransport: Send + Sync {
    /// Queues one frame on `channel`. Returns immediately; never retried by
    /// the caller.
    fn send(&self, channel: u8, data: &[u8]) -> Result<(), TransportError>;
}
