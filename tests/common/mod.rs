#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use paymenthub::application::client::PaymentClient;
use paymenthub::config::GatewayConfig;
use paymenthub::domain::order::OrderId;
use paymenthub::domain::payment::TransactionStatus;
use paymenthub::domain::ports::{OrderStore, OrderStoreBox};
use paymenthub::error::{PaymentError, Result};
use paymenthub::infrastructure::http::ReqwestTransport;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Bodies of the POST requests the stub gateway received, in order.
pub type Received = Arc<Mutex<Vec<Value>>>;

pub struct StubGateway {
    pub base_url: String,
    pub received: Received,
}

async fn token(State(received): State<Received>, Json(body): Json<Value>) -> Response {
    received.lock().unwrap().push(body.clone());
    if body["currency"] == "XXX" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "currency not supported"})),
        )
            .into_response();
    }
    let order_id = body["order_id"].as_str().unwrap_or_default();
    Json(json!({"payment_token": format!("tok_{order_id}")})).into_response()
}

async fn options(Path(token): Path<String>) -> Response {
    if !token.starts_with("tok_") {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown token"}))).into_response();
    }
    Json(json!({"payment_options": [
        {"code": "card", "label": "Card"},
        {"code": "bank_transfer", "label": "Bank transfer"}
    ]}))
    .into_response()
}

async fn option_details(Path((_token, code)): Path<(String, String)>) -> Response {
    if code != "card" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown option"}))).into_response();
    }
    Json(json!({"payment_option_details": {"fields": ["pan", "cvv", "expiry"]}})).into_response()
}

async fn payments(State(received): State<Received>, Json(body): Json<Value>) -> Response {
    received.lock().unwrap().push(body.clone());
    let token = body["payment_token"].as_str().unwrap_or_default();
    Json(json!({"redirect_url": format!("https://paymenthub.example.com/checkout/{token}?step=1")}))
        .into_response()
}

async fn inquiry(Path(token): Path<String>) -> Response {
    if !token.starts_with("tok_") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
    }
    Json(json!({"payment_inquiry_details": {"transaction_status": "pending", "token": token}}))
        .into_response()
}

/// Starts a PaymentHUB look-alike on an ephemeral local port.
pub async fn spawn_stub_gateway() -> StubGateway {
    let received = Received::default();
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/api/options/{token}", get(options))
        .route("/api/options/{token}/{code}", get(option_details))
        .route("/api/payments", post(payments))
        .route("/api/inquiry/{token}", get(inquiry))
        .with_state(received.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubGateway {
        base_url: format!("http://{addr}/api"),
        received,
    }
}

pub fn gateway_config(base_url: &str) -> GatewayConfig {
    GatewayConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
    }
}

pub fn http_client(base_url: &str, order_store: OrderStoreBox) -> PaymentClient {
    let transport = ReqwestTransport::new(&gateway_config(base_url)).unwrap();
    PaymentClient::new(Box::new(transport), order_store)
}

/// Store whose every operation fails, standing in for an unavailable database.
pub struct UnavailableStore;

#[async_trait]
impl OrderStore for UnavailableStore {
    async fn update(&self, _order_id: &OrderId, _status: &TransactionStatus) -> Result<()> {
        Err(PaymentError::StorageError("database is down".into()))
    }

    async fn get(&self, _order_id: &OrderId) -> Result<Option<TransactionStatus>> {
        Err(PaymentError::StorageError("database is down".into()))
    }
}
