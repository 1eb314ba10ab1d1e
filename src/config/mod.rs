//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FaucetConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the config file: the funding key comes from the
//!   environment or an encrypted keystore file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{FaucetConfig, PayoutConfig, WalletConfig};

/// Chain ids for networks the faucet is commonly pointed at, used when the
/// config does not pin one explicitly.
pub fn known_chain_id(network: &str) -> Option<u64> {
    match network.to_lowercase().as_str() {
        "scroll-sepolia" => Some(534351),
        "polygon-mumbai" => Some(80001),
        "arbitrum-goerli" => Some(421613),
        "optimism-goerli" => Some(420),
        "base-goerli" => Some(84531),
        _ => None,
    }
}
