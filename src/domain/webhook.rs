use super::order::OrderId;
use super::payment::TransactionStatus;
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Status push delivered by the gateway.
///
/// Parsing happens once at the boundary so that nothing downstream has to deal
/// with a half-formed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub transaction_status: TransactionStatus,
    pub order_id: OrderId,
    /// Gateway-defined fields this crate does not interpret.
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawPayload {
    transaction_status: Option<Value>,
    order_id: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl WebhookPayload {
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(PaymentError::ValidationError(
                "Webhook payload must be a JSON object".to_string(),
            ));
        }
        let raw = RawPayload::deserialize(value).map_err(|e| {
            PaymentError::ValidationError(format!("Malformed webhook payload: {e}"))
        })?;

        let transaction_status = required_string(raw.transaction_status, "transaction_status")?;
        let order_id = required_string(raw.order_id, "order_id")?;

        Ok(Self {
            transaction_status: TransactionStatus::new(transaction_status),
            order_id: OrderId::new(order_id)?,
            extra: raw.extra,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            PaymentError::ValidationError(format!("Webhook payload is not valid JSON: {e}"))
        })?;
        Self::from_value(&value)
    }
}

fn required_string(value: Option<Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Some(Value::String(_)) => Err(PaymentError::ValidationError(format!(
            "Webhook field `{field}` is empty"
        ))),
        Some(_) => Err(PaymentError::ValidationError(format!(
            "Webhook field `{field}` must be a string"
        ))),
        None => Err(PaymentError::ValidationError(format!(
            "Webhook field `{field}` is missing"
        ))),
    }
}
