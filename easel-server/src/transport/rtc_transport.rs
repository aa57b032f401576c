use crate::transport::{
    Channel, ChannelEvent, Frame, PeerTransport, RtcChannel, TransportConfig, TransportFactory,
};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use easel_core::{ChannelId, SdpType, SessionDescription};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// Builds `RtcTransport`s on top of the `webrtc` crate.
#[derive(Debug, Default, Clone)]
pub struct RtcTransportFactory;

#[async_trait]
impl TransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Arc<dyn PeerTransport>> {
        let transport = RtcTransport::new(config, events).await?;
        Ok(Arc::new(transport))
    }
}

pub struct RtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    /// Armed right before the local description is applied.
    gathering: Mutex<Option<mpsc::Receiver<()>>>,
}

impl RtcTransport {
    /// Creates the peer connection and wires its callbacks to `event_tx`.
    pub async fn new(config: &TransportConfig, event_tx: mpsc::Sender<ChannelEvent>) -> Result<Self> {
        // 1. Media engine and interceptors, even though only data channels are used
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // 2. ICE servers (STUN/TURN)
        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // A. Connection-level failure tears down every channel of this peer
        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    if matches!(
                        s,
                        RTCPeerConnectionState::Failed | RTCPeerConnectionState::Closed
                    ) {
                        let _ = tx.send(ChannelEvent::TransportClosed).await;
                    }
                })
            },
        ));

        // B. Data channels are always opened by the browser
        let dc_tx = event_tx;
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();

            Box::pin(async move {
                let id = bind_data_channel(&dc, tx);
                debug!("Remote opened data channel '{}' as {}", dc.label(), id);
            })
        }));

        Ok(Self {
            peer_connection,
            gathering: Mutex::new(None),
        })
    }
}

#[async_trait]
impl PeerTransport for RtcTransport {
    async fn set_remote_description(&self, offer: SessionDescription) -> Result<()> {
        if offer.sdp_type != SdpType::Offer {
            bail!("expected an offer, got {:?}", offer.sdp_type);
        }
        let desc = to_rtc(offer)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        from_rtc(answer)
    }

    async fn set_local_description(&self, answer: SessionDescription) -> Result<()> {
        let desc = to_rtc(answer)?;
        let gathering = self.peer_connection.gathering_complete_promise().await;
        *self.gathering.lock().await = Some(gathering);

        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn gathering_complete(&self) {
        let Some(mut gathering) = self.gathering.lock().await.take() else {
            warn!("ICE gathering awaited before a local description was set");
            return;
        };
        // The sender is dropped once gathering completes.
        let _ = gathering.recv().await;
    }

    async fn local_description(&self) -> Result<SessionDescription> {
        let desc = self
            .peer_connection
            .local_description()
            .await
            .context("No local description after ICE gathering")?;
        from_rtc(desc)
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Forwards the lifecycle of `dc` to `tx` under a fresh `ChannelId`.
///
/// Handlers are stored inside the data channel, so they only hold a weak
/// reference back to it.
fn bind_data_channel(dc: &Arc<RTCDataChannel>, tx: mpsc::Sender<ChannelEvent>) -> ChannelId {
    let id = ChannelId::new();

    let tx_open = tx.clone();
    let weak_dc = Arc::downgrade(dc);
    dc.on_open(Box::new(move || {
        Box::pin(async move {
            let Some(dc) = weak_dc.upgrade() else {
                return;
            };
            let channel: Arc<dyn Channel> = Arc::new(RtcChannel::new(id, dc));
            if tx_open.send(ChannelEvent::Opened(channel)).await.is_err() {
                warn!("Channel {} opened after its relay stopped", id);
            }
        })
    }));

    let tx_msg = tx.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx_msg.clone();

        Box::pin(async move {
            let _ = tx.send(ChannelEvent::Message(id, Frame::from(msg))).await;
        })
    }));

    dc.on_close(Box::new(move || {
        let tx = tx.clone();

        Box::pin(async move {
            let _ = tx.send(ChannelEvent::Closed(id)).await;
        })
    }));

    id
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
        SdpType::Pranswer => RTCSessionDescription::pranswer(desc.sdp)?,
        SdpType::Rollback => bail!("rollback descriptions are not supported"),
    };
    Ok(rtc)
}

fn from_rtc(desc: RTCSessionDescription) -> Result<SessionDescription> {
    let sdp_type = match desc.sdp_type {
        RTCSdpType::Offer => SdpType::Offer,
        RTCSdpType::Answer => SdpType::Answer,
        RTCSdpType::Pranswer => SdpType::Pranswer,
        RTCSdpType::Rollback => SdpType::Rollback,
        RTCSdpType::Unspecified => bail!("session description has no type"),
    };
    Ok(SessionDescription {
        sdp_type,
        sdp: desc.sdp,
    })
}
