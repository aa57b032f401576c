use crate::transport::{ChannelEvent, TransportConfig};
use anyhow::Result;
use async_trait::async_trait;
use easel_core::SessionDescription;
use std::sync::Arc;
use tokio::sync::mpsc;

/// One negotiated peer connection, answering side.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn set_remote_description(&self, offer: SessionDescription) -> Result<()>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    /// Applies the answer and starts ICE gathering.
    async fn set_local_description(&self, answer: SessionDescription) -> Result<()>;

    /// Resolves once ICE gathering has finished for this connection.
    async fn gathering_complete(&self);

    /// The local description including every gathered candidate.
    async fn local_description(&self) -> Result<SessionDescription>;

    async fn close(&self) -> Result<()>;
}

/// Creates peer transports. Every channel event of the created transport is
/// delivered to `events`, starting with channels opened during negotiation.
#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Arc<dyn PeerTransport>>;
}
