//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity and interval non-zero)
//! - Check addresses parse before they reach the dispatch path
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: FaucetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::FaucetConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &FaucetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.queue_cap == 0 {
        errors.push(ValidationError {
            field: "queue_cap",
            message: "queue capacity must be at least 1".to_string(),
        });
    }

    if config.interval_minutes == 0 {
        errors.push(ValidationError {
            field: "interval_minutes",
            message: "cooldown interval must be at least 1 minute".to_string(),
        });
    }

    if config.wallet.provider.is_empty() {
        errors.push(ValidationError {
            field: "wallet.provider",
            message: "JSON-RPC endpoint is required".to_string(),
        });
    }

    if config.wallet.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "wallet.rpc_timeout_secs",
            message: "RPC timeout must be at least 1 second".to_string(),
        });
    }

    if !config.payout.contract_address.is_empty()
        && config.payout.contract_address.parse::<Address>().is_err()
    {
        errors.push(ValidationError {
            field: "payout.contract_address",
            message: format!("not a valid address: {}", config.payout.contract_address),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FaucetConfig {
        let mut config = FaucetConfig::default();
        config.wallet.provider = "http://localhost:8545".to_string();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_missing_provider() {
        let config = FaucetConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "wallet.provider"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = FaucetConfig::default();
        config.queue_cap = 0;
        config.interval_minutes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn rejects_malformed_contract_address() {
        let mut config = valid_config();
        config.payout.contract_address = "not-an-address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "payout.contract_address"));
    }

    #[test]
    fn accepts_wellformed_contract_address() {
        let mut config = valid_config();
        config.payout.contract_address =
            "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
