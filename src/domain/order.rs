use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positive monetary amount sent to the gateway.
///
/// Serialized as a JSON number, which is what PaymentHUB expects on the wire.
/// Only values that survive the trip through `f64` unchanged are accepted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ));
        }
        if !survives_f64(value) {
            return Err(PaymentError::ValidationError(format!(
                "Amount {value} cannot be sent without losing precision"
            )));
        }
        Ok(Self(value))
    }
}

/// Reads the amount back from the shortest decimal form of its `f64`, the form it
/// takes in the request body.
fn survives_f64(value: Decimal) -> bool {
    value
        .to_f64()
        .and_then(|f| Decimal::from_str(&f.to_string()).ok())
        .is_some_and(|back| back == value)
}

/// ISO 4217 currency code, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(PaymentError::ValidationError(format!(
                "Currency must be a 3-letter ISO 4217 code, got `{code}`"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merchant-side order identifier. Opaque to this crate, only required to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PaymentError::ValidationError(
                "Order id must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The order a payment token is requested for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRef {
    pub order_id: OrderId,
    pub amount: Amount,
    pub currency: Currency,
}

impl OrderRef {
    pub fn new(order_id: &str, amount: Decimal, currency: &str) -> Result<Self> {
        Ok(Self {
            order_id: OrderId::new(order_id)?,
            amount: Amount::new(amount)?,
            currency: Currency::new(currency)?,
        })
    }
}
