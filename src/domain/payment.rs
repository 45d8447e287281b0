use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque per-attempt capability issued by the gateway.
///
/// Every call after `request_payment_token` is keyed by it. No expiry is tracked locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PaymentToken(String);

impl PaymentToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Payment token must not be empty".to_string(),
            ));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gateway-defined status string, e.g. `paid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionStatus(String);

impl TransactionStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the option list. Only `code` is interpreted; the rest is kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOption {
    pub code: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionDetails(pub Value);

impl OptionDetails {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Result of the status inquiry fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryResult(pub Value);

impl InquiryResult {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        self.field("transaction_status")
            .and_then(Value::as_str)
            .map(TransactionStatus::new)
    }
}
