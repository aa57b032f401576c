use crate::transport::{Channel, ChannelState, Frame};
use anyhow::{Context, Result};
use async_trait::async_trait;
use easel_core::ChannelId;
use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;

/// `Channel` backed by a WebRTC data channel opened by the remote peer.
pub struct RtcChannel {
    id: ChannelId,
    data_channel: Arc<RTCDataChannel>,
}

impl RtcChannel {
    pub fn new(id: ChannelId, data_channel: Arc<RTCDataChannel>) -> Self {
        Self { id, data_channel }
    }

    pub fn label(&self) -> &str {
        self.data_channel.label()
    }
}

#[async_trait]
impl Channel for RtcChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn state(&self) -> ChannelState {
        match self.data_channel.ready_state() {
            RTCDataChannelState::Open => ChannelState::Open,
            RTCDataChannelState::Closing | RTCDataChannelState::Closed => ChannelState::Closed,
            _ => ChannelState::Connecting,
        }
    }

    async fn send(&self, frame: &Frame) -> Result<()> {
        if frame.is_text {
            let text = std::str::from_utf8(&frame.data).context("Text frame is not UTF-8")?;
            self.data_channel.send_text(text.to_owned()).await?;
        } else {
            self.data_channel.send(&frame.data).await?;
        }
        Ok(())
    }
}

impl From<DataChannelMessage> for Frame {
    fn from(msg: DataChannelMessage) -> Self {
        Self {
            data: msg.data,
            is_text: msg.is_string,
        }
    }
}
