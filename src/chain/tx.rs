//! Transaction building, signing, and broadcast.
//!
//! # Responsibilities
//! - Fetch the funding account's pending nonce per dispatch
//! - Resolve the gas price (configured override or network-suggested)
//! - Build, EIP-155 sign, and broadcast legacy transactions
//!
//! The builder never retries: any failing stage aborts the dispatch and the
//! stage-tagged error is surfaced to the caller. Nonce correctness relies on
//! the single-flight lock held around every call (see `faucet::lock`).

use std::future::Future;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::chain::client::Ledger;
use crate::chain::types::ChainResult;
use crate::chain::wallet::Wallet;

/// Gas limit for a plain native transfer.
const GAS_LIMIT_TRANSFER: u64 = 50_000;

/// Gas limit for the faucet contract call, which executes recipient logic.
const GAS_LIMIT_CONTRACT_CALL: u64 = 500_000;

/// Convert whole ether units to wei.
pub fn ether_to_wei(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
}

/// The dispatch capability consumed by the claim handler and drain worker.
///
/// `TxBuilder` is the production implementation; integration tests substitute
/// a recording mock.
pub trait Dispatch: Send + Sync + 'static {
    /// The funding account address.
    fn sender(&self) -> Address;

    /// Send `value` wei to `to`. A zero `gas_price` means query the network.
    fn transfer(
        &self,
        to: Address,
        value: U256,
        gas_price: u128,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;

    /// Call the faucet contract with pre-encoded calldata. The transferred
    /// amounts live in the calldata; the transaction itself carries no value.
    fn multi_transfer(
        &self,
        contract: Address,
        data: Bytes,
        gas_price: u128,
    ) -> impl Future<Output = ChainResult<TxHash>> + Send;
}

/// Transaction builder bound to one funding wallet and one chain.
#[derive(Debug, Clone)]
pub struct TxBuilder<L> {
    client: L,
    wallet: Wallet,
    chain_id: u64,
}

impl<L: Ledger> TxBuilder<L> {
    /// Create a builder, resolving the chain id exactly once.
    ///
    /// When no explicit id is supplied the ledger is queried, so construction
    /// fails fast if connectivity cannot be established.
    pub async fn connect(client: L, wallet: Wallet, chain_id: Option<u64>) -> ChainResult<Self> {
        let chain_id = match chain_id {
            Some(id) => id,
            None => client.chain_id().await?,
        };

        tracing::info!(
            address = %wallet.address(),
            chain_id = chain_id,
            "Transaction builder initialized"
        );

        Ok(Self {
            client,
            wallet,
            chain_id,
        })
    }

    /// The chain id transactions are signed for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn build_and_send(
        &self,
        to: Address,
        value: U256,
        input: Bytes,
        gas_limit: u64,
        gas_price: u128,
    ) -> ChainResult<TxHash> {
        // Pending nonce counts unconfirmed transactions too, which keeps
        // back-to-back sends within one drain cycle from colliding.
        let nonce = self.client.pending_nonce(self.wallet.address()).await?;

        let gas_price = if gas_price == 0 {
            self.client.suggest_gas_price().await?
        } else {
            gas_price
        };

        let mut tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input,
        };

        let signature = self.wallet.sign_legacy(&mut tx)?;
        let envelope: TxEnvelope = tx.into_signed(signature).into();
        let hash = *envelope.tx_hash();

        self.client.broadcast(&envelope.encoded_2718()).await?;

        Ok(hash)
    }
}

impl<L: Ledger + 'static> Dispatch for TxBuilder<L> {
    fn sender(&self) -> Address {
        self.wallet.address()
    }

    async fn transfer(&self, to: Address, value: U256, gas_price: u128) -> ChainResult<TxHash> {
        self.build_and_send(to, value, Bytes::new(), GAS_LIMIT_TRANSFER, gas_price)
            .await
    }

    async fn multi_transfer(
        &self,
        contract: Address,
        data: Bytes,
        gas_price: u128,
    ) -> ChainResult<TxHash> {
        self.build_and_send(contract, U256::ZERO, data, GAS_LIMIT_CONTRACT_CALL, gas_price)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::ChainError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[derive(Clone, Default)]
    struct MockLedger {
        nonce: u64,
        gas_price: u128,
        network_chain_id: u64,
        gas_price_queried: Arc<AtomicBool>,
        broadcasts: Arc<AtomicUsize>,
        fail_broadcast: bool,
    }

    impl Ledger for MockLedger {
        async fn pending_nonce(&self, _account: Address) -> ChainResult<u64> {
            Ok(self.nonce)
        }

        async fn suggest_gas_price(&self) -> ChainResult<u128> {
            self.gas_price_queried.store(true, Ordering::SeqCst);
            Ok(self.gas_price)
        }

        async fn chain_id(&self) -> ChainResult<u64> {
            Ok(self.network_chain_id)
        }

        async fn broadcast(&self, raw: &[u8]) -> ChainResult<()> {
            assert!(!raw.is_empty());
            if self.fail_broadcast {
                return Err(ChainError::Broadcast("node rejected".to_string()));
            }
            self.broadcasts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn wallet() -> Wallet {
        Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap()
    }

    #[test]
    fn ether_conversion() {
        assert_eq!(ether_to_wei(0), U256::ZERO);
        assert_eq!(ether_to_wei(1), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(ether_to_wei(3), U256::from(3u64) * ether_to_wei(1));
    }

    #[tokio::test]
    async fn explicit_chain_id_skips_query() {
        let ledger = MockLedger {
            network_chain_id: 31337,
            ..Default::default()
        };
        let builder = TxBuilder::connect(ledger, wallet(), Some(5)).await.unwrap();
        assert_eq!(builder.chain_id(), 5);
    }

    #[tokio::test]
    async fn chain_id_queried_when_absent() {
        let ledger = MockLedger {
            network_chain_id: 31337,
            ..Default::default()
        };
        let builder = TxBuilder::connect(ledger, wallet(), None).await.unwrap();
        assert_eq!(builder.chain_id(), 31337);
    }

    #[tokio::test]
    async fn zero_gas_price_asks_the_network() {
        let ledger = MockLedger {
            gas_price: 2_000_000_000,
            network_chain_id: 1,
            ..Default::default()
        };
        let queried = ledger.gas_price_queried.clone();
        let broadcasts = ledger.broadcasts.clone();

        let builder = TxBuilder::connect(ledger, wallet(), None).await.unwrap();
        let hash = builder
            .transfer(Address::ZERO, ether_to_wei(1), 0)
            .await
            .unwrap();

        assert_ne!(hash, TxHash::ZERO);
        assert!(queried.load(Ordering::SeqCst));
        assert_eq!(broadcasts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn supplied_gas_price_used_verbatim() {
        let ledger = MockLedger {
            network_chain_id: 1,
            ..Default::default()
        };
        let queried = ledger.gas_price_queried.clone();

        let builder = TxBuilder::connect(ledger, wallet(), None).await.unwrap();
        builder
            .transfer(Address::ZERO, ether_to_wei(1), 1_500_000_000)
            .await
            .unwrap();

        assert!(!queried.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn broadcast_failure_surfaces() {
        let ledger = MockLedger {
            network_chain_id: 1,
            fail_broadcast: true,
            ..Default::default()
        };
        let builder = TxBuilder::connect(ledger, wallet(), None).await.unwrap();
        let err = builder
            .transfer(Address::ZERO, ether_to_wei(1), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Broadcast(_)));
    }

    #[tokio::test]
    async fn multi_transfer_targets_the_contract() {
        let ledger = MockLedger {
            network_chain_id: 1,
            ..Default::default()
        };
        let broadcasts = ledger.broadcasts.clone();

        let contract: Address = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef"
            .parse()
            .unwrap();
        let builder = TxBuilder::connect(ledger, wallet(), None).await.unwrap();
        let hash = builder
            .multi_transfer(contract, Bytes::from(vec![0xab; 100]), 1)
            .await
            .unwrap();

        assert_ne!(hash, TxHash::ZERO);
        assert_eq!(broadcasts.load(Ordering::SeqCst), 1);
    }
}
