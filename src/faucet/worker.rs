//! Background worker draining the dispatch queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::chain::tx::Dispatch;
use crate::faucet::dispatch::{dispatch_claim, DispatchPolicy};
use crate::faucet::lock::SingleFlight;
use crate::faucet::queue::DispatchQueue;

/// How often the queue is checked for pending claims.
const DRAIN_PERIOD: Duration = Duration::from_secs(1);

/// Recurring task that empties the claim queue one transaction at a time.
pub struct DrainWorker<D> {
    queue: Arc<DispatchQueue>,
    flight: Arc<SingleFlight>,
    dispatcher: Arc<D>,
    policy: Arc<DispatchPolicy>,
}

impl<D: Dispatch> DrainWorker<D> {
    pub fn new(
        queue: Arc<DispatchQueue>,
        flight: Arc<SingleFlight>,
        dispatcher: Arc<D>,
        policy: Arc<DispatchPolicy>,
    ) -> Self {
        Self {
            queue,
            flight,
            dispatcher,
            policy,
        }
    }

    /// Run forever on a fixed period.
    pub async fn run(self) {
        let mut ticker = interval(DRAIN_PERIOD);
        loop {
            ticker.tick().await;
            self.drain().await;
        }
    }

    /// Fully empty the queue, dispatching one transaction per entry.
    ///
    /// A blocking lock acquire is fine here: this is a background task, not
    /// a request thread. Per-address failures are logged and the drain
    /// continues with the remaining entries. Unlike the request path, the
    /// outbound call is not bounded by a timeout.
    pub async fn drain(&self) {
        if self.queue.is_empty() {
            return;
        }

        let _permit = self.flight.acquire().await;
        while let Some(address) = self.queue.pop() {
            match dispatch_claim(self.dispatcher.as_ref(), &self.policy, address).await {
                Ok(tx_hash) => {
                    tracing::info!(
                        tx_hash = %tx_hash,
                        address = %address,
                        "Dispatched from queue"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        address = %address,
                        error = %e,
                        "Failed to dispatch queued claim"
                    );
                }
            }
        }
    }
}
