use thiserror::Error;

/// Failures raised while talking to PaymentHUB.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gateway responded with status {status}: {body}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },
    #[error("field `{0}` missing from gateway response")]
    MissingField(&'static str),
    #[error("field `{field}` in gateway response is malformed: {reason}")]
    MalformedField { field: &'static str, reason: String },
    #[error("transport failure: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Storage error: {0}")]
    StorageError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        PaymentError::StorageError(Box::new(e))
    }
}

impl PaymentError {
    /// True for the failure kinds a caller caused and cannot fix by retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, PaymentError::ValidationError(_))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
