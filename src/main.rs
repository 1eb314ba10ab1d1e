//! Faucet binary: configuration, credential loading, and startup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evm_faucet::chain::{RpcClient, TxBuilder, Wallet};
use evm_faucet::config::validation::validate_config;
use evm_faucet::config::{known_chain_id, load_config, FaucetConfig};
use evm_faucet::FaucetServer;

#[derive(Parser)]
#[command(name = "evm-faucet", version, about = "EVM testnet faucet service")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the HTTP listener port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the JSON-RPC endpoint
    #[arg(long)]
    provider: Option<String>,

    /// Override the network display name
    #[arg(long)]
    network_name: Option<String>,

    /// Keystore file holding the funding key (alternative to FAUCET_PRIVATE_KEY)
    #[arg(long)]
    keystore: Option<PathBuf>,

    /// Passphrase text file for the keystore
    #[arg(long)]
    keystore_password_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evm_faucet=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Arc::new(resolve_config(&cli)?);

    tracing::info!(
        http_port = config.http_port,
        network = %config.network_name,
        queue_cap = config.queue_cap,
        interval_minutes = config.interval_minutes,
        "Configuration loaded"
    );

    let wallet = load_wallet(&config)?;
    tracing::info!(address = %wallet.address(), "Funding wallet loaded");

    let chain_id = config
        .chain_id
        .or_else(|| known_chain_id(&config.network_name));

    let client = RpcClient::new(&config.wallet.provider, config.wallet.rpc_timeout_secs)?;
    // Fatal when the endpoint is unreachable and no chain id is pinned.
    let builder = TxBuilder::connect(client, wallet, chain_id).await?;

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    let server = FaucetServer::new(builder, config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Load the config file (when given), apply CLI overrides, and validate.
fn resolve_config(cli: &Cli) -> Result<FaucetConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FaucetConfig::default(),
    };

    if let Some(port) = cli.http_port {
        config.http_port = port;
    }
    if let Some(provider) = &cli.provider {
        config.wallet.provider = provider.clone();
    }
    if let Some(name) = &cli.network_name {
        config.network_name = name.clone();
    }
    if let Some(keystore) = &cli.keystore {
        config.wallet.keystore = keystore.display().to_string();
    }
    if let Some(password_file) = &cli.keystore_password_file {
        config.wallet.keystore_password_file = password_file.display().to_string();
    }

    validate_config(&config).map_err(|errors| {
        let summary = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("invalid configuration: {}", summary)
    })?;

    Ok(config)
}

/// Resolve the funding credential: raw key from the environment first, then
/// the keystore file.
fn load_wallet(config: &FaucetConfig) -> Result<Wallet, Box<dyn std::error::Error>> {
    if std::env::var(evm_faucet::chain::wallet::PRIVATE_KEY_ENV_VAR).is_ok() {
        return Ok(Wallet::from_env()?);
    }

    if !config.wallet.keystore.is_empty() {
        return Ok(Wallet::from_keystore(
            config.wallet.keystore.as_ref(),
            config.wallet.keystore_password_file.as_ref(),
        )?);
    }

    Err("missing private key or keystore: set FAUCET_PRIVATE_KEY or configure wallet.keystore".into())
}
