use crate::room::Room;
use crate::signaling::NegotiationError;
use crate::transport::{ChannelEvent, PeerTransport, TransportConfig, TransportFactory};
use anyhow::Context;
use bytes::Bytes;
use easel_core::{ChannelId, SessionDescription};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const EVENT_BUFFER: usize = 256;

/// Turns a browser's SDP offer into an answer and binds the resulting peer
/// connection to the room.
///
/// Every call is independent; calls for different peers run in parallel and
/// share nothing but the room.
pub struct Negotiator {
    room: Arc<Room>,
    factory: Arc<dyn TransportFactory>,
    config: TransportConfig,
}

impl Negotiator {
    pub fn new(room: Arc<Room>, factory: Arc<dyn TransportFactory>, config: TransportConfig) -> Self {
        Self {
            room,
            factory,
            config,
        }
    }

    pub fn room(&self) -> &Arc<Room> {
        &self.room
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Runs one offer/answer exchange and returns the JSON-encoded answer.
    ///
    /// The peer's data channel opens after the answer has reached the browser,
    /// so joining the room happens later, on the relay task spawned here.
    pub async fn negotiate(&self, offer: &[u8]) -> Result<Bytes, NegotiationError> {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);

        let transport = self
            .factory
            .create(&self.config, event_tx.clone())
            .await
            .map_err(NegotiationError::ConnectionInit)?;

        // Channel events can fire while the offer is applied, so the relay has
        // to be listening before that.
        tokio::spawn(relay_events(
            Arc::clone(&self.room),
            Arc::clone(&transport),
            event_rx,
        ));

        match self.exchange(transport.as_ref(), offer).await {
            Ok(answer) => {
                info!("Negotiation finished, answer is {} bytes", answer.len());
                Ok(answer)
            }
            Err(e) => {
                // Stops the relay, which closes the transport on its way out.
                let _ = event_tx.send(ChannelEvent::TransportClosed).await;
                Err(e)
            }
        }
    }

    async fn exchange(
        &self,
        transport: &dyn PeerTransport,
        offer: &[u8],
    ) -> Result<Bytes, NegotiationError> {
        let offer: SessionDescription = serde_json::from_slice(offer)
            .context("Offer is not a session description")
            .map_err(NegotiationError::BadRemoteDescription)?;

        transport
            .set_remote_description(offer)
            .await
            .map_err(NegotiationError::BadRemoteDescription)?;

        let answer = transport
            .create_answer()
            .await
            .map_err(NegotiationError::AnswerGeneration)?;

        transport
            .set_local_description(answer)
            .await
            .map_err(NegotiationError::BadLocalDescription)?;

        match self.config.ice_gathering_timeout {
            Some(limit) => tokio::time::timeout(limit, transport.gathering_complete())
                .await
                .map_err(|_| NegotiationError::IceGatheringTimeout(limit))?,
            None => transport.gathering_complete().await,
        }

        let local = transport
            .local_description()
            .await
            .map_err(NegotiationError::BadLocalDescription)?;

        let body = serde_json::to_vec(&local)
            .context("Failed to serialize local description")
            .map_err(NegotiationError::BadLocalDescription)?;

        Ok(Bytes::from(body))
    }
}

/// Applies one peer's channel events to the room until the peer connection
/// goes away, then removes whatever that peer still had in the room.
async fn relay_events(
    room: Arc<Room>,
    transport: Arc<dyn PeerTransport>,
    mut events: mpsc::Receiver<ChannelEvent>,
) {
    let mut joined: HashSet<ChannelId> = HashSet::new();

    while let Some(event) = events.recv().await {
        match event {
            ChannelEvent::Opened(channel) => {
                info!("Channel {} open", channel.id());
                joined.insert(channel.id());
                room.join(channel).await;
            }

            ChannelEvent::Message(sender, frame) => {
                room.broadcast(&frame, sender).await;
            }

            ChannelEvent::Closed(id) => {
                info!("Channel {} closed", id);
                joined.remove(&id);
                room.leave(&id).await;
            }

            ChannelEvent::TransportClosed => break,
        }
    }

    for id in joined {
        room.leave(&id).await;
    }

    // Late callbacks from the closing connection must not wait on a full queue.
    drop(events);
    if let Err(e) = transport.close().await {
        warn!("Failed to close peer connection: {:#}", e);
    }
    debug!("Peer relay finished");
}
