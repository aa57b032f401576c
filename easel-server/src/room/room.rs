use crate::transport::{Channel, ChannelState, Frame};
use easel_core::ChannelId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// The shared drawing session: every data channel that is currently open.
///
/// One `Room` is created at startup and handed to every negotiator behind an
/// `Arc`. Membership changes take the write lock; broadcasts share the read
/// lock for the whole fan-out, sends included, so a slow member delays other
/// writers but never corrupts the set.
#[derive(Default)]
pub struct Room {
    members: RwLock<HashMap<ChannelId, Arc<dyn Channel>>>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an opened channel. Joining twice has no further effect.
    pub async fn join(&self, channel: Arc<dyn Channel>) {
        let id = channel.id();
        let mut members = self.members.write().await;

        match members.entry(id) {
            Entry::Occupied(_) => debug!("Channel {} already in the room", id),
            Entry::Vacant(slot) => {
                slot.insert(channel);
                info!("Channel {} joined ({} in room)", id, members.len());
            }
        }
    }

    /// Removes a channel if it is a member.
    pub async fn leave(&self, id: &ChannelId) {
        let mut members = self.members.write().await;

        if members.remove(id).is_some() {
            info!("Channel {} left ({} in room)", id, members.len());
        }
    }

    /// Sends `frame` to every open member except `sender`.
    ///
    /// A failed send is logged and skipped; it never stops delivery to the
    /// remaining members. Returns how many members accepted the frame.
    pub async fn broadcast(&self, frame: &Frame, sender: ChannelId) -> usize {
        let members = self.members.read().await;
        let mut delivered = 0;

        for (id, channel) in members.iter() {
            if *id == sender || channel.state() != ChannelState::Open {
                continue;
            }

            // The channel may close between the state check and the send; that
            // only costs this one message.
            match channel.send(frame).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to relay message to channel {}: {:#}", id, e),
            }
        }

        debug!(
            "Relayed {} bytes from {} to {} channel(s)",
            frame.len(),
            sender,
            delivered
        );
        delivered
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.members.read().await.is_empty()
    }

    pub async fn contains(&self, id: &ChannelId) -> bool {
        self.members.read().await.contains_key(id)
    }

    pub async fn members(&self) -> Vec<ChannelId> {
        self.members.read().await.keys().copied().collect()
    }
}
