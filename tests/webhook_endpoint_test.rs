mod common;

use common::{UnavailableStore, http_client};
use paymenthub::application::client::PaymentClient;
use paymenthub::domain::order::OrderId;
use paymenthub::domain::payment::TransactionStatus;
use paymenthub::domain::ports::OrderStore;
use paymenthub::infrastructure::in_memory::InMemoryOrderStore;
use paymenthub::interfaces::webhook;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_webhook(client: PaymentClient) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = webhook::router(Arc::new(client));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/webhook")
}

#[tokio::test]
async fn test_webhook_acknowledges_and_persists() {
    let store = InMemoryOrderStore::new();
    // The webhook never reaches the gateway, so the base URL is irrelevant.
    let url = spawn_webhook(http_client("http://127.0.0.1:9", Box::new(store.clone()))).await;
    let http = reqwest::Client::new();

    for _ in 0..2 {
        let res = http
            .post(&url)
            .json(&json!({"transaction_status": "paid", "order_id": "A1", "amount": 10}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"received": true, "transaction_status": "paid"}));
    }

    let stored = store.get(&OrderId::new("A1").unwrap()).await.unwrap();
    assert_eq!(stored, Some(TransactionStatus::new("paid")));
}

#[tokio::test]
async fn test_webhook_rejects_incomplete_payload() {
    let store = InMemoryOrderStore::new();
    let url = spawn_webhook(http_client("http://127.0.0.1:9", Box::new(store.clone()))).await;
    let http = reqwest::Client::new();

    let res = http
        .post(&url)
        .json(&json!({"order_id": "A1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("transaction_status"));

    assert!(
        store
            .get(&OrderId::new("A1").unwrap())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_webhook_rejects_invalid_json() {
    let url = spawn_webhook(http_client(
        "http://127.0.0.1:9",
        Box::new(InMemoryOrderStore::new()),
    ))
    .await;

    let res = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_webhook_storage_failure_asks_for_redelivery() {
    let url = spawn_webhook(http_client("http://127.0.0.1:9", Box::new(UnavailableStore))).await;

    let res = reqwest::Client::new()
        .post(&url)
        .json(&json!({"transaction_status": "paid", "order_id": "A1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
}
