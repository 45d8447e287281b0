use crate::config::GatewayConfig;
use crate::domain::ports::{GatewayRequest, GatewayResponse, HttpTransport, Method};
use crate::error::{GatewayError, PaymentError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

/// `HttpTransport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                PaymentError::ValidationError(format!(
                    "Gateway base URL `{}` is not a valid base URL",
                    config.base_url
                ))
            })?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::from(GatewayError::Transport(Box::new(e))))?;
        Ok(Self { client, base_url })
    }

    /// Appends `segments` to the base URL, percent-encoding each one so that `/`,
    /// `?` and `#` inside a segment stay part of it.
    pub fn url(&self, segments: &[String]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: GatewayRequest) -> Result<GatewayResponse> {
        let url = self.url(&request.segments);
        tracing::debug!(%url, method = ?request.method, body = ?request.body, "Gateway API request");

        let builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let res = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(Box::new(e)))?;
        let status = res.status().as_u16();
        let text = res
            .text()
            .await
            .map_err(|e| GatewayError::Transport(Box::new(e)))?;

        // Error pages are not always JSON; keep them readable in the error.
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(_) if text.is_empty() => Value::Null,
            Err(_) => Value::String(text),
        };
        tracing::debug!(%url, status, %body, "Gateway API response");

        Ok(GatewayResponse { status, body })
    }
}
