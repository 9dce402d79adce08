//! FIFO admission queue.

use std::collections::VecDeque;

use loadgrid_core::Request;

use crate::error::{BalancerError, BalancerResult};

/// Requests waiting for a worker, in admission order.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    inner: VecDeque<Request>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: Request) {
        self.inner.push_back(request);
    }

    /// Remove the head. Fails with `QueueEmpty` rather than panicking.
    pub fn pop(&mut self) -> BalancerResult<Request> {
        self.inner.pop_front().ok_or(BalancerError::QueueEmpty)
    }

    pub fn peek(&self) -> Option<&Request> {
        self.inner.front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
