mod channel;
mod peer_transport;
mod rtc_channel;
mod rtc_transport;
mod transport_config;
mod transport_event;

pub use channel::*;
pub use peer_transport::*;
pub use rtc_channel::*;
pub use rtc_transport::*;
pub use transport_config::*;
pub use transport_event::*;
