use async_trait::async_trait;
use bytes::Bytes;
use easel_core::ChannelId;

/// Lifecycle of a data channel as seen by the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// One data channel message together with its frame kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Bytes,
    pub is_text: bool,
}

impl Frame {
    pub fn text(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            is_text: true,
        }
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            is_text: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One peer's data path. The room only ever talks to channels through this
/// trait, so it never depends on the WebRTC stack directly.
#[async_trait]
pub trait Channel: Send + Sync + 'static {
    fn id(&self) -> ChannelId;

    fn state(&self) -> ChannelState;

    /// Send one message frame, keeping its kind. Payloads are opaque to the relay.
    async fn send(&self, frame: &Frame) -> anyhow::Result<()>;
}
