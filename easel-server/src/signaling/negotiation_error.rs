use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use thiserror::Error;

/// Failure of one offer/answer exchange. Each variant is the step that failed.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("connection-init-failed: {0:#}")]
    ConnectionInit(anyhow::Error),

    #[error("bad-remote-description: {0:#}")]
    BadRemoteDescription(anyhow::Error),

    #[error("answer-generation-failed: {0:#}")]
    AnswerGeneration(anyhow::Error),

    #[error("bad-local-description: {0:#}")]
    BadLocalDescription(anyhow::Error),

    #[error("ice-gathering-timeout: gathering did not finish within {0:?}")]
    IceGatheringTimeout(Duration),
}

impl NegotiationError {
    /// Stable short code, also used as the HTTP error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionInit(_) => "connection-init-failed",
            Self::BadRemoteDescription(_) => "bad-remote-description",
            Self::AnswerGeneration(_) => "answer-generation-failed",
            Self::BadLocalDescription(_) => "bad-local-description",
            Self::IceGatheringTimeout(_) => "ice-gathering-timeout",
        }
    }
}

impl IntoResponse for NegotiationError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.kind()).into_response()
    }
}
