//! Chain-specific types and error definitions.

use thiserror::Error;

/// Errors that can occur while building or sending a transaction.
///
/// Variants are tagged by the stage that failed so callers (HTTP handler or
/// drain worker) can report exactly where a dispatch died.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Pending nonce query failed.
    #[error("nonce query failed: {0}")]
    Nonce(String),

    /// Suggested gas price query failed.
    #[error("gas price query failed: {0}")]
    GasPrice(String),

    /// Chain id could not be resolved at startup.
    #[error("chain id resolution failed: {0}")]
    ChainId(String),

    /// Invalid private key, keystore, or signing failure.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// Transaction signing failed.
    #[error("signing failed: {0}")]
    Sign(String),

    /// Broadcast of the signed payload failed.
    #[error("broadcast failed: {0}")]
    Broadcast(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;
