//! Event sink: the balancer's only reporting channel.
//!
//! The balancer never formats output itself. It notifies an `EventSink`
//! on scale-up, scale-down, and every Nth blocked request. All methods
//! default to doing nothing.

use loadgrid_core::{Cycle, WorkerId};
use serde::Serialize;
use tracing::{info, warn};

/// A pool resize that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleEvent {
    /// Cycle the adjustment was made on.
    pub cycle: Cycle,
    /// Worker that was added or removed.
    pub worker_id: WorkerId,
    /// Pool size after the adjustment.
    pub workers: usize,
    /// Queue length the decision was based on.
    pub queue_len: usize,
}

pub trait EventSink: Send {
    fn scaled_up(&mut self, _event: &ScaleEvent) {}

    fn scaled_down(&mut self, _event: &ScaleEvent) {}

    /// Called once every `blocked_report_interval` blocked requests with
    /// the running total.
    fn requests_blocked(&mut self, _cycle: Cycle, _total_blocked: u64) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn scaled_up(&mut self, event: &ScaleEvent) {
        info!(
            cycle = event.cycle,
            worker = event.worker_id,
            workers = event.workers,
            queue = event.queue_len,
            "scaling up: added worker"
        );
    }

    fn scaled_down(&mut self, event: &ScaleEvent) {
        info!(
            cycle = event.cycle,
            worker = event.worker_id,
            workers = event.workers,
            queue = event.queue_len,
            "scaling down: removed worker"
        );
    }

    fn requests_blocked(&mut self, cycle: Cycle, total_blocked: u64) {
        warn!(cycle, total_blocked, "firewall blocked requests");
    }
}
