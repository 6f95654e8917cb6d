use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::Level;

use siren_core::config::Config;
use siren_core::error::{Result, SirenError};
use siren_core::model::alert::Alert;

use crate::batch;
use crate::connector;
use crate::decode::decode_envelope;
use crate::infra;
use crate::notify::Notifier;
use crate::storage::BlobClient;

#[derive(Clone)]
pub struct PushState {
    pub notifier: Notifier,
    pub blobs: BlobClient,
    pub console_base: String,
    pub batch_ui_base: String,
}

impl PushState {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            notifier: Notifier::new(&cfg.webhook_url, cfg.request_timeout)?,
            blobs: BlobClient::new(&cfg.storage_endpoint, cfg.request_timeout)?,
            console_base: cfg.console_base_url.clone(),
            batch_ui_base: cfg.batch_ui_base.clone(),
        })
    }
}

/// Push wrapper around an event payload: `{"message": {"data": "<base64>"}}`.
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
}

#[derive(Debug, Deserialize)]
pub struct PushMessage {
    pub data: String,
}

/// Storage notification naming the blob that changed.
#[derive(Debug, Deserialize)]
pub struct BlobRef {
    pub bucket: String,
    pub name: String,
}

pub fn router(state: PushState) -> Router {
    Router::new()
        .route("/push/connector", post(push_connector))
        .route("/push/infra", post(push_infra))
        .route("/push/batch", post(push_batch))
        .layer(
            TraceLayer::new_for_http()
                .on_request(tower_http::trace::DefaultOnRequest::new().level(Level::INFO))
                .on_response(tower_http::trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub async fn run_push_server(cfg: &Config) -> Result<()> {
    let state = PushState::from_config(cfg)?;
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .map_err(|e| SirenError::Config(format!("failed to bind {}: {e}", cfg.listen_addr)))?;
    tracing::info!(addr = %cfg.listen_addr, "push endpoints listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|e| SirenError::Internal(format!("push server failed: {e}")))
}

async fn push_connector(
    State(state): State<PushState>,
    Json(push): Json<PushEnvelope>,
) -> StatusCode {
    let envelope = match decode_envelope(&push.message.data) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "connector push decode failed");
            return StatusCode::BAD_REQUEST;
        }
    };
    match connector::handle(&envelope, &state.console_base) {
        Ok(Some(alert)) => deliver(&state, &alert).await,
        Ok(None) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::warn!(error = %e, "connector push rejected");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn push_infra(State(state): State<PushState>, Json(push): Json<PushEnvelope>) -> StatusCode {
    let envelope = match decode_envelope(&push.message.data) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "infra push decode failed");
            return StatusCode::BAD_REQUEST;
        }
    };
    match infra::handle(&envelope) {
        Ok(Some(alert)) => deliver(&state, &alert).await,
        Ok(None) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::warn!(error = %e, "infra push rejected");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn push_batch(State(state): State<PushState>, Json(blob): Json<BlobRef>) -> StatusCode {
    match batch::handle(&state.blobs, &blob.bucket, &blob.name, &state.batch_ui_base).await {
        Ok(Some(alert)) => deliver(&state, &alert).await,
        Ok(None) => StatusCode::NO_CONTENT,
        Err(SirenError::Storage(e)) => {
            tracing::warn!(error = %e, bucket = %blob.bucket, name = %blob.name, "blob fetch failed");
            StatusCode::BAD_GATEWAY
        }
        Err(e) => {
            tracing::warn!(error = %e, "batch push rejected");
            StatusCode::BAD_REQUEST
        }
    }
}

async fn deliver(state: &PushState, alert: &Alert) -> StatusCode {
    match state.notifier.send(alert).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "alert delivery failed");
            StatusCode::BAD_GATEWAY
        }
    }
}
