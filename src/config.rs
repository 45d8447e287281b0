use clap::Args;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://paymenthub.example.com/api";

/// Gateway connection settings. Every flag falls back to an environment variable,
/// which may come from a `.env` file.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// PaymentHUB API base URL
    #[arg(long, env = "PAYMENTHUB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "PAYMENTHUB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<GatewayArgs> for GatewayConfig {
    fn from(args: GatewayArgs) -> Self {
        Self {
            base_url: args.base_url,
            timeout: Duration::from_secs(args.timeout_secs),
        }
    }
}
