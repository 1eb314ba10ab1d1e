//! Dispatch engine: bounded queue, single-flight lock, payout policy, and
//! the background drain worker.

pub mod dispatch;
pub mod lock;
pub mod queue;
pub mod worker;

pub use dispatch::{dispatch_claim, DispatchPolicy};
pub use lock::SingleFlight;
pub use queue::{DispatchQueue, QueueFull};
pub use worker::DrainWorker;
