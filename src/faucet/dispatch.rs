//! Per-claim dispatch: payout policy and path selection.
//!
//! Both the synchronous claim handler and the background drain worker funnel
//! through [`dispatch_claim`], so the plain-transfer vs. contract-call choice
//! and the calldata encoding live in exactly one place.

use alloy::primitives::{Address, TxHash, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::chain::tx::{ether_to_wei, Dispatch};
use crate::chain::types::ChainResult;
use crate::config::schema::FaucetConfig;
use crate::config::validation::ValidationError;

sol! {
    /// Faucet contract entry point paying out the native token plus two
    /// stablecoins in a single transaction.
    function multiTransfer(
        address _to,
        uint256 _ethAmount,
        uint256 _usdtAmount,
        uint256 _usdcAmount
    );
}

/// Immutable payout parameters derived from the configuration at startup.
#[derive(Debug, Clone)]
pub struct DispatchPolicy {
    /// Faucet contract for multi-token payouts; `None` selects the plain
    /// native-transfer path.
    pub contract: Option<Address>,
    /// Whole native units per claim.
    pub native_amount: u64,
    /// Whole USDT units per claim (contract path).
    pub usdt_amount: u64,
    /// Whole USDC units per claim (contract path).
    pub usdc_amount: u64,
    /// Gas price override in wei; zero means query the network.
    pub gas_price: u128,
}

impl DispatchPolicy {
    pub fn from_config(config: &FaucetConfig) -> Result<Self, ValidationError> {
        let contract = if config.payout.contract_address.is_empty() {
            None
        } else {
            Some(config.payout.contract_address.parse().map_err(|e| {
                ValidationError {
                    field: "payout.contract_address",
                    message: format!("not a valid address: {}", e),
                }
            })?)
        };

        Ok(Self {
            contract,
            native_amount: config.payout.native_amount,
            usdt_amount: config.payout.usdt_amount,
            usdc_amount: config.payout.usdc_amount,
            gas_price: config.payout.gas_price,
        })
    }
}

/// Build and send one transaction for `to` according to the policy.
///
/// Contract configured: encode `multiTransfer` with the destination and the
/// configured amounts and send it to the contract (the transaction carries no
/// value). Otherwise: plain transfer of the configured native amount.
pub async fn dispatch_claim<D: Dispatch>(
    dispatcher: &D,
    policy: &DispatchPolicy,
    to: Address,
) -> ChainResult<TxHash> {
    match policy.contract {
        Some(contract) => {
            // All three amounts are handed to the contract exactly as
            // configured; any unit scaling is the contract's business.
            let call = multiTransferCall {
                _to: to,
                _ethAmount: U256::from(policy.native_amount),
                _usdtAmount: U256::from(policy.usdt_amount),
                _usdcAmount: U256::from(policy.usdc_amount),
            };
            dispatcher
                .multi_transfer(contract, call.abi_encode().into(), policy.gas_price)
                .await
        }
        None => {
            dispatcher
                .transfer(to, ether_to_wei(policy.native_amount), policy.gas_price)
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::ChainError;
    use alloy::primitives::Bytes;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    enum Sent {
        Transfer { to: Address, value: U256, gas_price: u128 },
        Multi { contract: Address, data: Bytes, gas_price: u128 },
    }

    #[derive(Clone, Default)]
    struct MockDispatch {
        sent: Arc<Mutex<Vec<Sent>>>,
        fail: bool,
    }

    impl Dispatch for MockDispatch {
        fn sender(&self) -> Address {
            Address::repeat_byte(0xfa)
        }

        async fn transfer(
            &self,
            to: Address,
            value: U256,
            gas_price: u128,
        ) -> ChainResult<TxHash> {
            if self.fail {
                return Err(ChainError::Broadcast("down".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Transfer { to, value, gas_price });
            Ok(TxHash::repeat_byte(0x11))
        }

        async fn multi_transfer(
            &self,
            contract: Address,
            data: Bytes,
            gas_price: u128,
        ) -> ChainResult<TxHash> {
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Multi { contract, data, gas_price });
            Ok(TxHash::repeat_byte(0x22))
        }
    }

    fn plain_policy() -> DispatchPolicy {
        DispatchPolicy {
            contract: None,
            native_amount: 1,
            usdt_amount: 0,
            usdc_amount: 0,
            gas_price: 0,
        }
    }

    #[tokio::test]
    async fn plain_path_transfers_configured_amount() {
        let mock = MockDispatch::default();
        let to = Address::repeat_byte(0x01);

        let hash = dispatch_claim(&mock, &plain_policy(), to).await.unwrap();

        assert_eq!(hash, TxHash::repeat_byte(0x11));
        let sent = mock.sent.lock().unwrap();
        assert_eq!(
            sent[0],
            Sent::Transfer {
                to,
                value: ether_to_wei(1),
                gas_price: 0,
            }
        );
    }

    #[tokio::test]
    async fn contract_path_encodes_multi_transfer() {
        let contract = Address::repeat_byte(0xcc);
        let policy = DispatchPolicy {
            contract: Some(contract),
            native_amount: 1,
            usdt_amount: 50,
            usdc_amount: 75,
            gas_price: 7,
        };
        let mock = MockDispatch::default();
        let to = Address::repeat_byte(0x02);

        dispatch_claim(&mock, &policy, to).await.unwrap();

        let sent = mock.sent.lock().unwrap();
        let Sent::Multi { contract: sent_to, data, gas_price } = &sent[0] else {
            panic!("expected contract call, got {:?}", sent[0]);
        };
        // Sent to the contract, not the claimant.
        assert_eq!(*sent_to, contract);
        assert_eq!(*gas_price, 7);

        let call = multiTransferCall::abi_decode(data).unwrap();
        assert_eq!(call._to, to);
        // Configured amounts pass through unscaled, the native one included;
        // only the plain-transfer path converts to wei.
        assert_eq!(call._ethAmount, U256::from(1u64));
        assert_eq!(call._usdtAmount, U256::from(50u64));
        assert_eq!(call._usdcAmount, U256::from(75u64));
    }

    #[tokio::test]
    async fn failure_surfaces_without_retry() {
        let mock = MockDispatch {
            fail: true,
            ..Default::default()
        };
        let err = dispatch_claim(&mock, &plain_policy(), Address::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Broadcast(_)));
        assert!(mock.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn policy_from_config_parses_contract() {
        let mut config = FaucetConfig::default();
        let policy = DispatchPolicy::from_config(&config).unwrap();
        assert!(policy.contract.is_none());

        config.payout.contract_address =
            "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef".to_string();
        let policy = DispatchPolicy::from_config(&config).unwrap();
        assert!(policy.contract.is_some());

        config.payout.contract_address = "bogus".to_string();
        assert!(DispatchPolicy::from_config(&config).is_err());
    }
}
