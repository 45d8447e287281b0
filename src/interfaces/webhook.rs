use crate::application::client::PaymentClient;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::instrument;

/// Receives status pushes from the gateway.
///
/// Answers 200 for accepted and duplicate deliveries, 400 when the payload is
/// unusable (redelivering it will not help) and 500 otherwise so the gateway
/// tries again.
#[instrument(skip_all)]
async fn webhook_handler(
    State(client): State<Arc<PaymentClient>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    match client.handle_webhook_bytes(&body).await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({"received": true, "transaction_status": status})),
        ),
        Err(e) if e.is_validation() => {
            (StatusCode::BAD_REQUEST, Json(json!({"error": e.to_string()})))
        }
        Err(e) => {
            tracing::error!("Failed to process webhook: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}

pub fn router(client: Arc<PaymentClient>) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .with_state(client)
}

/// Serves the webhook endpoint until ctrl-c.
pub async fn serve(listener: TcpListener, client: Arc<PaymentClient>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Serving webhook endpoint on {addr}");
    }
    axum::serve(listener, router(client))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
