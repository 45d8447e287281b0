use crate::domain::order::{Amount, Currency, OrderRef};
use crate::domain::payment::{
    InquiryResult, OptionDetails, PaymentOption, PaymentToken, TransactionStatus,
};
use crate::domain::ports::{GatewayRequest, GatewayResponse, OrderStoreBox, TransportBox};
use crate::domain::webhook::WebhookPayload;
use crate::error::{GatewayError, PaymentError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

#[derive(Serialize)]
struct TokenRequest<'a> {
    order_id: &'a str,
    amount: Amount,
    currency: &'a Currency,
}

#[derive(Serialize)]
struct PaymentRequest<'a> {
    payment_token: &'a PaymentToken,
    amount: Amount,
    currency: &'a Currency,
}

/// Merchant-side entry point to PaymentHUB.
///
/// Each operation is one request/response round trip through the injected
/// transport. Nothing is cached between calls, and ordering (token, options,
/// payment) is left to the caller.
pub struct PaymentClient {
    transport: TransportBox,
    order_store: OrderStoreBox,
}

impl PaymentClient {
    /// Creates a new `PaymentClient`.
    ///
    /// # Arguments
    ///
    /// * `transport` - Outbound HTTP capability bound to the gateway base URL.
    /// * `order_store` - Receives statuses reported through the webhook.
    pub fn new(transport: TransportBox, order_store: OrderStoreBox) -> Self {
        Self {
            transport,
            order_store,
        }
    }

    /// Requests a token for a new transaction attempt.
    #[instrument(skip_all, fields(order_id = %order.order_id))]
    pub async fn request_payment_token(&self, order: &OrderRef) -> Result<PaymentToken> {
        let body = to_body(&TokenRequest {
            order_id: order.order_id.as_str(),
            amount: order.amount,
            currency: &order.currency,
        })?;
        let response = self.transport.send(GatewayRequest::post(["token"], body)).await?;
        let token: String = extract_field(response, "payment_token")?;
        PaymentToken::new(token).map_err(|_| {
            GatewayError::MalformedField {
                field: "payment_token",
                reason: "empty token".to_string(),
            }
            .into()
        })
    }

    #[instrument(skip_all)]
    pub async fn fetch_payment_options(&self, token: &PaymentToken) -> Result<Vec<PaymentOption>> {
        let segments = ["options", path_segment(token.as_str())?];
        let response = self.transport.send(GatewayRequest::get(segments)).await?;
        extract_field(response, "payment_options")
    }

    #[instrument(skip_all, fields(option_code = %option_code))]
    pub async fn fetch_option_details(
        &self,
        token: &PaymentToken,
        option_code: &str,
    ) -> Result<OptionDetails> {
        if option_code.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Option code must not be empty".to_string(),
            ));
        }
        let segments = [
            "options",
            path_segment(token.as_str())?,
            path_segment(option_code)?,
        ];
        let response = self.transport.send(GatewayRequest::get(segments)).await?;
        extract_field(response, "payment_option_details")
    }

    /// Starts the payment and returns the URL the end user must be redirected to.
    #[instrument(skip_all)]
    pub async fn initiate_payment(
        &self,
        token: &PaymentToken,
        amount: Amount,
        currency: &Currency,
    ) -> Result<String> {
        let body = to_body(&PaymentRequest {
            payment_token: token,
            amount,
            currency,
        })?;
        let response = self
            .transport
            .send(GatewayRequest::post(["payments"], body))
            .await?;
        extract_field(response, "redirect_url")
    }

    /// Processes a status push from the gateway.
    ///
    /// Deliveries are idempotent per order: the store is only written when the
    /// reported status differs from the one already recorded.
    #[instrument(skip_all)]
    pub async fn handle_webhook_callback(&self, payload: &Value) -> Result<TransactionStatus> {
        self.record_status(WebhookPayload::from_value(payload)).await
    }

    /// Same as [`PaymentClient::handle_webhook_callback`], for a raw request body.
    /// A body that is not JSON is a validation failure.
    #[instrument(skip_all)]
    pub async fn handle_webhook_bytes(&self, body: &[u8]) -> Result<TransactionStatus> {
        self.record_status(WebhookPayload::from_slice(body)).await
    }

    async fn record_status(&self, parsed: Result<WebhookPayload>) -> Result<TransactionStatus> {
        let payload = match parsed {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Rejected webhook payload: {e}");
                return Err(e);
            }
        };

        let current = self.order_store.get(&payload.order_id).await?;
        if current.as_ref() == Some(&payload.transaction_status) {
            tracing::debug!(
                order_id = %payload.order_id,
                status = %payload.transaction_status,
                "Duplicate webhook delivery"
            );
            return Ok(payload.transaction_status);
        }

        self.order_store
            .update(&payload.order_id, &payload.transaction_status)
            .await?;
        tracing::info!(
            order_id = %payload.order_id,
            status = %payload.transaction_status,
            "Updated order status"
        );
        Ok(payload.transaction_status)
    }

    /// Pulls the transaction status; the fallback when a webhook is late or lost.
    #[instrument(skip_all)]
    pub async fn inquire_payment_status(&self, token: &PaymentToken) -> Result<InquiryResult> {
        let segments = ["inquiry", path_segment(token.as_str())?];
        let response = self.transport.send(GatewayRequest::get(segments)).await?;
        extract_field(response, "payment_inquiry_details")
    }
}

/// Tokens and option codes are opaque, but `.` and `..` would be dropped or
/// resolved by URL normalization and point the request at another endpoint.
fn path_segment(value: &str) -> Result<&str> {
    if matches!(value, "." | "..") {
        return Err(PaymentError::ValidationError(format!(
            "`{value}` is not usable as a path segment"
        )));
    }
    Ok(value)
}

fn to_body(request: &impl Serialize) -> Result<Value> {
    serde_json::to_value(request)
        .map_err(|e| PaymentError::ValidationError(format!("Unserializable request: {e}")))
}

/// Pulls one named member out of a successful gateway response.
fn extract_field<T: DeserializeOwned>(response: GatewayResponse, field: &'static str) -> Result<T> {
    if !response.is_success() {
        return Err(GatewayError::Status {
            status: response.status,
            body: response.body,
        }
        .into());
    }

    let GatewayResponse { body, .. } = response;
    let value = match body {
        Value::Object(mut map) => map.remove(field),
        _ => None,
    };
    let value = match value {
        Some(Value::Null) | None => return Err(GatewayError::MissingField(field).into()),
        Some(value) => value,
    };

    serde_json::from_value(value).map_err(|e| {
        GatewayError::MalformedField {
            field,
            reason: e.to_string(),
        }
        .into()
    })
}
