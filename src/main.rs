use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paymenthub::application::client::PaymentClient;
use paymenthub::config::{GatewayArgs, GatewayConfig};
use paymenthub::domain::order::{Amount, Currency, OrderRef};
use paymenthub::domain::payment::PaymentToken;
use paymenthub::domain::ports::OrderStoreBox;
use paymenthub::infrastructure::http::ReqwestTransport;
use paymenthub::infrastructure::in_memory::InMemoryOrderStore;
use paymenthub::interfaces::webhook;
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    gateway: GatewayArgs,

    /// Path to persistent order database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYMENTHUB_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a payment token for an order
    Token {
        #[arg(long)]
        order_id: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long)]
        currency: String,
    },
    /// List the payment options available for a token
    Options { token: String },
    /// Show the details of one payment option
    OptionDetails { token: String, code: String },
    /// Initiate the payment and print the redirect URL
    Pay {
        token: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long)]
        currency: String,
    },
    /// Inquire the status of a payment
    Inquire { token: String },
    /// Process one webhook payload read from a JSON file
    Webhook { payload: PathBuf },
    /// Serve the webhook endpoint
    Serve {
        #[arg(long, env = "PORT", default_value_t = 3030)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before the subscriber, so RUST_LOG from .env applies.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment variables from .env file");
    }

    let cli = Cli::parse();
    let config = GatewayConfig::from(cli.gateway);
    let transport = ReqwestTransport::new(&config).into_diagnostic()?;
    let client = PaymentClient::new(Box::new(transport), order_store(cli.db_path)?);

    match cli.command {
        Command::Token {
            order_id,
            amount,
            currency,
        } => {
            let order = OrderRef::new(&order_id, amount, &currency).into_diagnostic()?;
            let token = client.request_payment_token(&order).await.into_diagnostic()?;
            println!("{token}");
        }
        Command::Options { token } => {
            let token = PaymentToken::new(token).into_diagnostic()?;
            let options = client.fetch_payment_options(&token).await.into_diagnostic()?;
            print_json(&options)?;
        }
        Command::OptionDetails { token, code } => {
            let token = PaymentToken::new(token).into_diagnostic()?;
            let details = client
                .fetch_option_details(&token, &code)
                .await
                .into_diagnostic()?;
            print_json(&details)?;
        }
        Command::Pay {
            token,
            amount,
            currency,
        } => {
            let token = PaymentToken::new(token).into_diagnostic()?;
            let amount = Amount::new(amount).into_diagnostic()?;
            let currency = Currency::new(&currency).into_diagnostic()?;
            let redirect_url = client
                .initiate_payment(&token, amount, &currency)
                .await
                .into_diagnostic()?;
            println!("{redirect_url}");
        }
        Command::Inquire { token } => {
            let token = PaymentToken::new(token).into_diagnostic()?;
            let result = client.inquire_payment_status(&token).await.into_diagnostic()?;
            print_json(&result)?;
        }
        Command::Webhook { payload } => {
            let body = tokio::fs::read(payload).await.into_diagnostic()?;
            let status = client
                .handle_webhook_bytes(&body)
                .await
                .into_diagnostic()?;
            println!("{status}");
        }
        Command::Serve { port } => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))
                    .await
                    .into_diagnostic()?;
            webhook::serve(listener, Arc::new(client))
                .await
                .into_diagnostic()?;
        }
    }

    Ok(())
}

fn order_store(db_path: Option<PathBuf>) -> Result<OrderStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use paymenthub::infrastructure::rocksdb::RocksDBOrderStore;
            let store = RocksDBOrderStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryOrderStore::new()))
        }
        None => Ok(Box::new(InMemoryOrderStore::new())),
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{out}");
    Ok(())
}
