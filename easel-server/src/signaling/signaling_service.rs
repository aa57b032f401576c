use crate::signaling::{Negotiator, ice_servers_handler, sdp_handler};
use axum::Router;
use axum::routing::{get, post};
use easel_core::IceServerConfig;
use std::sync::Arc;

/// Axum state for the signaling endpoints.
#[derive(Clone)]
pub struct SignalingService {
    negotiator: Arc<Negotiator>,
}

impl SignalingService {
    pub fn new(negotiator: Arc<Negotiator>) -> Self {
        Self { negotiator }
    }

    pub fn negotiator(&self) -> &Negotiator {
        &self.negotiator
    }

    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        self.negotiator.config().ice_servers.clone()
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/sdp", post(sdp_handler))
            .route("/ice-servers", get(ice_servers_handler))
            .with_state(self)
    }
}
