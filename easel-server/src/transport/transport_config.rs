use easel_core::IceServerConfig;
use std::time::Duration;

pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Settings applied to every peer connection the server creates.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,

    /// Upper bound for ICE gathering during negotiation. `None` waits for as
    /// long as the ICE agent takes.
    pub ice_gathering_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun(DEFAULT_STUN_SERVER)],
            ice_gathering_timeout: None,
        }
    }
}
