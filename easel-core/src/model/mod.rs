mod channel;
mod drawing;
mod signaling;

pub use channel::ChannelId;
pub use drawing::DrawLine;
pub use signaling::{IceServerConfig, SdpType, SessionDescription};
