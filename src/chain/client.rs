//! Ledger RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query pending nonce, suggested gas price, and chain id
//! - Broadcast signed transaction payloads
//! - Bound every call with a configured timeout

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use tokio::time::timeout;

use crate::chain::types::{ChainError, ChainResult};

/// The narrow ledger capability the transaction builder depends on.
///
/// `RpcClient` is the production implementation; tests substitute a mock to
/// exercise the builder without a node.
pub trait Ledger: Send + Sync {
    /// Transaction count for `account` including pending transactions.
    fn pending_nonce(&self, account: Address) -> impl Future<Output = ChainResult<u64>> + Send;

    /// Network-suggested gas price in wei.
    fn suggest_gas_price(&self) -> impl Future<Output = ChainResult<u128>> + Send;

    /// Chain id of the connected network.
    fn chain_id(&self) -> impl Future<Output = ChainResult<u64>> + Send;

    /// Submit a signed, RLP-encoded transaction.
    fn broadcast(&self, raw: &[u8]) -> impl Future<Output = ChainResult<()>> + Send;
}

/// JSON-RPC client wrapper around an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    timeout_secs: u64,
}

impl RpcClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: &str, timeout_secs: u64) -> ChainResult<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| ChainError::Rpc(format!("invalid RPC URL '{}': {}", endpoint, e)))?;

        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            timeout_secs,
        })
    }

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Ledger for RpcClient {
    async fn pending_nonce(&self, account: Address) -> ChainResult<u64> {
        let fut = self.provider.get_transaction_count(account).pending();
        match timeout(self.timeout_duration(), fut).await {
            Ok(Ok(nonce)) => Ok(nonce),
            Ok(Err(e)) => Err(ChainError::Nonce(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.timeout_secs)),
        }
    }

    async fn suggest_gas_price(&self) -> ChainResult<u128> {
        let fut = self.provider.get_gas_price();
        match timeout(self.timeout_duration(), fut).await {
            Ok(Ok(price)) => Ok(price),
            Ok(Err(e)) => Err(ChainError::GasPrice(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.timeout_secs)),
        }
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        let fut = self.provider.get_chain_id();
        match timeout(self.timeout_duration(), fut).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(ChainError::ChainId(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.timeout_secs)),
        }
    }

    async fn broadcast(&self, raw: &[u8]) -> ChainResult<()> {
        let fut = self.provider.send_raw_transaction(raw);
        match timeout(self.timeout_duration(), fut).await {
            Ok(Ok(_pending)) => Ok(()),
            Ok(Err(e)) => Err(ChainError::Broadcast(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.timeout_secs)),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
