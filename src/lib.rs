//! EVM Faucet Dispatch Service
//!
//! Accepts claim requests from untrusted clients, rate-limits them per
//! origin, and dispatches signed transfers from a single funding account.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌─────────────────────────────────────────────────────┐
//!                │                      FAUCET                         │
//!                │                                                     │
//!  POST /claim   │  ┌──────────┐   ┌─────────┐   ┌────────────────┐   │
//!  ──────────────┼─▶│ cooldown │──▶│  claim  │──▶│ single-flight  │   │
//!                │  │   gate   │   │ handler │   │     lock       │   │
//!                │  └──────────┘   └────┬────┘   └───────┬────────┘   │
//!                │                      │ busy           │ idle       │
//!                │                      ▼                ▼            │
//!                │               ┌────────────┐   ┌────────────┐      │
//!                │               │  dispatch  │   │ tx builder │──────┼──▶ ledger RPC
//!                │               │   queue    │   │ sign+send  │      │
//!                │               └─────┬──────┘   └──────▲─────┘      │
//!                │                     │ drained every   │            │
//!                │                     │ second          │            │
//!                │                     └─────────────────┘            │
//!                └─────────────────────────────────────────────────────┘
//! ```
//!
//! A single permit serializes every transaction build: the request path uses
//! a non-blocking try-acquire and falls back to the bounded queue, the
//! background drain worker uses a blocking acquire. The funding account's
//! pending nonce is fetched only after the lock is held, so back-to-back
//! sends never collide on a nonce.

pub mod chain;
pub mod config;
pub mod faucet;
pub mod server;

pub use config::FaucetConfig;
pub use server::FaucetServer;
