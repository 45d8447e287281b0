use super::order::OrderId;
use super::payment::TransactionStatus;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A call against the gateway.
///
/// `segments` are relative to the configured base URL; each one is sent as a
/// single, escaped path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl GatewayRequest {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Get,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::Post,
            segments: segments.into_iter().map(Into::into).collect(),
            body: Some(body),
        }
    }

    /// Unescaped `a/b/c` form, for logs and assertions.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: Value,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP capability.
///
/// Implementations hand back every HTTP status as a response and only fail on
/// connection-level problems; interpreting the status is the caller's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse>;
}

/// Where webhook-reported statuses end up.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn update(&self, order_id: &OrderId, status: &TransactionStatus) -> Result<()>;
    async fn get(&self, order_id: &OrderId) -> Result<Option<TransactionStatus>>;
}

pub type TransportBox = Box<dyn HttpTransport>;
pub type OrderStoreBox = Box<dyn OrderStore>;
