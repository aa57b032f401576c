use crate::transport::{Channel, Frame};
use easel_core::ChannelId;
use std::sync::Arc;

/// Events a peer transport emits for the negotiator's relay task.
pub enum ChannelEvent {
    /// The remote side opened a data channel and it is ready for writes.
    Opened(Arc<dyn Channel>),

    /// A message arrived on one of the peer's channels.
    Message(ChannelId, Frame),

    /// The channel was closed by either side.
    Closed(ChannelId),

    /// The whole peer connection failed or was closed.
    TransportClosed,
}
