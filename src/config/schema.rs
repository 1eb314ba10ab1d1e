//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the faucet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the faucet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FaucetConfig {
    /// Listener port for the HTTP API and front-end.
    pub http_port: u16,

    /// Count of trusted reverse proxies in front of the server. When
    /// non-zero, the client origin is taken from `X-Forwarded-For`.
    pub proxy_count: usize,

    /// Maximum number of claims waiting to be dispatched.
    pub queue_cap: usize,

    /// Minutes a client must wait between funding rounds.
    pub interval_minutes: u64,

    /// Network name displayed on the front-end; also consulted for a known
    /// chain id when `chain_id` is unset.
    pub network_name: String,

    /// Explicit chain id. Unset means: look up the network name, then fall
    /// back to querying the RPC endpoint at startup.
    pub chain_id: Option<u64>,

    /// Payout amounts and destination contract.
    pub payout: PayoutConfig,

    /// Funding wallet and RPC endpoint settings.
    pub wallet: WalletConfig,
}

/// Per-claim payout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PayoutConfig {
    /// Faucet contract address for multi-token payouts. Empty means plain
    /// native transfers directly to the claimant.
    pub contract_address: String,

    /// Whole native-token units (ether) to transfer per claim.
    pub native_amount: u64,

    /// Whole USDT units to transfer per claim (contract path only).
    pub usdt_amount: u64,

    /// Whole USDC units to transfer per claim (contract path only).
    pub usdc_amount: u64,

    /// Gas price in wei. Zero means query the network per dispatch.
    pub gas_price: u128,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            native_amount: 1,
            usdt_amount: 0,
            usdc_amount: 0,
            gas_price: 0,
        }
    }
}

/// Funding wallet configuration.
///
/// The raw private key is intentionally absent here; it is read from the
/// `FAUCET_PRIVATE_KEY` environment variable or decrypted from the keystore.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Endpoint for the JSON-RPC connection.
    pub provider: String,

    /// Path to an encrypted keystore file (alternative to the env key).
    pub keystore: String,

    /// Path to a text file holding the keystore passphrase.
    pub keystore_password_file: String,

    /// Timeout in seconds applied to each RPC call.
    pub rpc_timeout_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            keystore: String::new(),
            keystore_password_file: "password.txt".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            proxy_count: 0,
            queue_cap: 10,
            interval_minutes: 1,
            network_name: "testnet".to_string(),
            chain_id: None,
            payout: PayoutConfig::default(),
            wallet: WalletConfig::default(),
        }
    }
}
