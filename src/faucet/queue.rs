//! Bounded FIFO queue of pending claim addresses.

use std::collections::VecDeque;
use std::sync::Mutex;

use alloy::primitives::Address;
use thiserror::Error;

/// Returned when the queue is at capacity; the claim is rejected, not queued.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("dispatch queue is full")]
pub struct QueueFull;

/// Fixed-capacity, insertion-ordered buffer of claim destinations.
///
/// Enqueue never blocks and never displaces older entries: past capacity it
/// fails immediately with [`QueueFull`]. Removal is performed only by the
/// drain worker.
#[derive(Debug)]
pub struct DispatchQueue {
    inner: Mutex<VecDeque<Address>>,
    capacity: usize,
}

impl DispatchQueue {
    /// Create a queue with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an address, failing fast when full.
    pub fn try_push(&self, address: Address) -> Result<(), QueueFull> {
        let mut queue = self.inner.lock().expect("dispatch queue mutex poisoned");
        if queue.len() >= self.capacity {
            return Err(QueueFull);
        }
        queue.push_back(address);
        Ok(())
    }

    /// Remove and return the oldest queued address.
    pub fn pop(&self) -> Option<Address> {
        self.inner
            .lock()
            .expect("dispatch queue mutex poisoned")
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("dispatch queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
