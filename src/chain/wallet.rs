//! Funding wallet management and transaction signing.
//!
//! # Security
//! - The raw private key is loaded only from an environment variable
//! - Encrypted keystore files are supported as an alternative key source
//! - Keys are never logged or serialized

use std::path::Path;

use alloy::consensus::TxLegacy;
use alloy::network::TxSignerSync;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signature;

use crate::chain::types::{ChainError, ChainResult};

/// Environment variable name for the funding private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "FAUCET_PRIVATE_KEY";

/// Funding wallet holding the signing credential for the process lifetime.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// The `0x` prefix is optional. The key is parsed and held in memory
    /// only; it is never logged.
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Load the wallet from the `FAUCET_PRIVATE_KEY` environment variable.
    pub fn from_env() -> ChainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ChainError::Wallet(format!("environment variable {} not set", PRIVATE_KEY_ENV_VAR))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Decrypt a keystore file using the passphrase stored in a text file.
    ///
    /// Trailing newlines in the passphrase file are stripped, matching how
    /// such files are usually produced by `echo`.
    pub fn from_keystore(keystore: &Path, password_file: &Path) -> ChainResult<Self> {
        let password = std::fs::read_to_string(password_file).map_err(|e| {
            ChainError::Wallet(format!(
                "cannot read passphrase file {}: {}",
                password_file.display(),
                e
            ))
        })?;
        let password = password.trim_end_matches(['\r', '\n']);

        let signer = PrivateKeySigner::decrypt_keystore(keystore, password)
            .map_err(|e| ChainError::Wallet(format!("keystore decryption failed: {}", e)))?;

        Ok(Self { signer })
    }

    /// The funding account address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a legacy transaction in place and return the signature.
    ///
    /// The transaction's `chain_id` field drives EIP-155 replay protection.
    pub fn sign_legacy(&self, tx: &mut TxLegacy) -> ChainResult<Signature> {
        TxSignerSync::sign_transaction_sync(&self.signer, tx)
            .map_err(|e| ChainError::Sign(e.to_string()))
    }
}
