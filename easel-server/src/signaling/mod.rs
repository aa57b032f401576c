mod negotiation_error;
mod negotiator;
mod sdp_handler;
mod signaling_service;

pub use negotiation_error::*;
pub use negotiator::*;
pub use sdp_handler::*;
pub use signaling_service::*;
