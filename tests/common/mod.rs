//! Shared utilities for integration testing: a recording mock dispatcher and
//! an in-process faucet server on an ephemeral port.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use tokio::net::TcpListener;

use evm_faucet::chain::{ChainError, ChainResult, Dispatch};
use evm_faucet::config::FaucetConfig;
use evm_faucet::server::AppState;
use evm_faucet::FaucetServer;

/// One transaction the mock was asked to send.
#[derive(Debug, Clone, PartialEq)]
pub struct SentTx {
    /// Destination account (claimant for transfers, contract for calls).
    pub to: Address,
    pub value: U256,
    /// Calldata for the contract path, `None` for plain transfers.
    pub data: Option<Bytes>,
}

/// Dispatcher double that records instead of talking to a node.
#[derive(Clone, Default)]
pub struct MockDispatch {
    pub sent: Arc<Mutex<Vec<SentTx>>>,
    pub fail: bool,
}

impl MockDispatch {
    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.lock().unwrap().clone()
    }
}

impl Dispatch for MockDispatch {
    fn sender(&self) -> Address {
        Address::repeat_byte(0xfa)
    }

    async fn transfer(&self, to: Address, value: U256, _gas_price: u128) -> ChainResult<TxHash> {
        if self.fail {
            return Err(ChainError::Broadcast("node unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentTx {
            to,
            value,
            data: None,
        });
        Ok(TxHash::repeat_byte(0xaa))
    }

    async fn multi_transfer(
        &self,
        contract: Address,
        data: Bytes,
        _gas_price: u128,
    ) -> ChainResult<TxHash> {
        if self.fail {
            return Err(ChainError::Broadcast("node unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentTx {
            to: contract,
            value: U256::ZERO,
            data: Some(data),
        });
        Ok(TxHash::repeat_byte(0xbb))
    }
}

/// Running faucet plus handles into its dispatch engine.
pub struct TestFaucet {
    pub url: String,
    pub state: AppState<MockDispatch>,
}

/// Serve the real router with the mock dispatcher on an ephemeral port.
pub async fn start_faucet(config: FaucetConfig, mock: MockDispatch) -> TestFaucet {
    let server = FaucetServer::new(mock, Arc::new(config)).unwrap();
    let state = server.state().clone();
    let router = server.router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestFaucet {
        url: format!("http://{}", addr),
        state,
    }
}

/// A well-formed claimant address derived from one byte.
pub fn claimant(byte: u8) -> Address {
    Address::repeat_byte(byte)
}
