use crate::transport::TransportError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use switchboard_core::EnvelopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("unknown peer: {0}")]
    UnknownPeer(String),

    #[error("signaling actor stopped")]
    ActorStopped,

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    MalformedEnvelope(#[from] EnvelopeError),

    #[error("negotiation payload codec error: {0}")]
    PayloadCodec(#[source] serde_json::Error),

    #[error("negotiation timed out after {0:?}")]
    NegotiationTimeout(Duration),

    #[error("too many negotiations in flight (limit {0})")]
    Overloaded(usize),
}

impl SignalingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SignalingError::UnknownPeer(_) => StatusCode::NOT_FOUND,
            SignalingError::ActorStopped | SignalingError::Overloaded(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SignalingError::NegotiationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SignalingError::PayloadCodec(_) => StatusCode::BAD_GATEWAY,
            SignalingError::Transport(_) | SignalingError::MalformedEnvelope(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for SignalingError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub type SignalingResult<T> = Result<T, SignalingError>;
