//! Single-flight lock serializing every transaction dispatch.

use tokio::sync::{Semaphore, SemaphorePermit};

/// Mutual-exclusion token guaranteeing at most one dispatch in progress.
///
/// The request path uses [`try_acquire`](SingleFlight::try_acquire) so a
/// busy faucet degrades to enqueueing instead of blocking an HTTP worker;
/// the drain worker uses the blocking [`acquire`](SingleFlight::acquire).
/// The permit is released on drop, on every exit path.
#[derive(Debug)]
pub struct SingleFlight {
    permit: Semaphore,
}

/// Held while a dispatch is in progress.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self {
            permit: Semaphore::new(1),
        }
    }

    /// Non-blocking acquisition; `None` when a dispatch is already running.
    pub fn try_acquire(&self) -> Option<FlightPermit<'_>> {
        self.permit
            .try_acquire()
            .ok()
            .map(|permit| FlightPermit { _permit: permit })
    }

    /// Wait until the current dispatch (if any) finishes.
    pub async fn acquire(&self) -> FlightPermit<'_> {
        let permit = self
            .permit
            .acquire()
            .await
            .expect("single-flight semaphore closed");
        FlightPermit { _permit: permit }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_one_holder() {
        let flight = SingleFlight::new();
        let held = flight.try_acquire().unwrap();
        assert!(flight.try_acquire().is_none());
        drop(held);
        assert!(flight.try_acquire().is_some());
    }

    #[tokio::test]
    async fn blocking_acquire_waits_for_release() {
        let flight = std::sync::Arc::new(SingleFlight::new());
        let held = flight.try_acquire().unwrap();

        let waiter = {
            let flight = flight.clone();
            tokio::spawn(async move {
                let _permit = flight.acquire().await;
            })
        };

        // The waiter cannot finish while the permit is held.
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn released_on_every_exit_path() {
        let flight = SingleFlight::new();
        {
            let _permit = flight.acquire().await;
            // Simulated dispatch failure: permit still dropped by scope exit.
        }
        assert!(flight.try_acquire().is_some());
    }
}
