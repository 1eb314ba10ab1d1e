//! Ledger connectivity, funding wallet, and transaction building.

pub mod client;
pub mod tx;
pub mod types;
pub mod wallet;

pub use client::{Ledger, RpcClient};
pub use tx::{ether_to_wei, Dispatch, TxBuilder};
pub use types::{ChainError, ChainResult};
pub use wallet::Wallet;
