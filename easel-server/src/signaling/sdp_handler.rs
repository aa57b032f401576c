use crate::signaling::{NegotiationError, SignalingService};
use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use bytes::Bytes;
use easel_core::IceServerConfig;
use tracing::error;

/// `POST /sdp`: body is the browser's offer, response is the answer.
pub async fn sdp_handler(
    State(service): State<SignalingService>,
    body: Bytes,
) -> Result<impl IntoResponse, NegotiationError> {
    match service.negotiator().negotiate(&body).await {
        Ok(answer) => Ok(([(header::CONTENT_TYPE, "application/json")], answer)),
        Err(e) => {
            error!("Negotiation failed: {}", e);
            Err(e)
        }
    }
}

/// `GET /ice-servers`: the ICE servers the relay itself uses, so the page can
/// configure its own peer connection the same way.
pub async fn ice_servers_handler(
    State(service): State<SignalingService>,
) -> Json<Vec<IceServerConfig>> {
    Json(service.ice_servers())
}
