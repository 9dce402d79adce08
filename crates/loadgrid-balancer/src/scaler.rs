//! Autoscaler: queue-pressure scaling with a cooldown window.
//!
//! Compares the queue length against per-worker high/low thresholds and
//! decides whether to grow or shrink the pool by one worker. A cooldown
//! measured in cycles keeps consecutive adjustments apart.

use loadgrid_core::{Cycle, SimulationConfig};
use tracing::trace;

/// A scaling decision for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDecision {
    /// Add one idle worker at the end of the pool.
    ScaleUp,
    /// Remove the last worker, which is idle.
    ScaleDown,
    /// No change needed.
    NoChange,
}

/// Hysteresis thresholds and pool bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingPolicy {
    /// Grow when `queue > high_threshold * workers`.
    pub high_threshold: u32,
    /// Shrink when `queue < low_threshold * workers`.
    pub low_threshold: u32,
    pub max_workers: u32,
    /// Minimum cycles between two adjustments.
    pub cooldown: Cycle,
}

impl ScalingPolicy {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            high_threshold: config.queue_high_threshold,
            low_threshold: config.queue_low_threshold,
            max_workers: config.max_servers,
            cooldown: config.server_adjustment_delay,
        }
    }

    /// Threshold check without cooldown. Scale-up wins if both hold.
    ///
    /// `last_idle` is whether the highest-indexed worker is idle; only
    /// that worker may be removed, so a busy tail blocks scale-down.
    pub fn decide(&self, queue_len: usize, workers: usize, last_idle: bool) -> ScaleDecision {
        let queue_len = queue_len as u64;
        let workers = workers as u64;

        if queue_len > u64::from(self.high_threshold) * workers
            && workers < u64::from(self.max_workers)
        {
            return ScaleDecision::ScaleUp;
        }

        if queue_len < u64::from(self.low_threshold) * workers && workers > 1 && last_idle {
            return ScaleDecision::ScaleDown;
        }

        ScaleDecision::NoChange
    }
}

/// Applies a `ScalingPolicy` subject to the cooldown window.
#[derive(Debug, Clone)]
pub struct Autoscaler {
    policy: ScalingPolicy,
    /// Cycle of the last adjustment. Starts at 0.
    last_adjustment: Cycle,
}

impl Autoscaler {
    pub fn new(policy: ScalingPolicy) -> Self {
        Self {
            policy,
            last_adjustment: 0,
        }
    }

    pub fn policy(&self) -> &ScalingPolicy {
        &self.policy
    }

    pub fn last_adjustment(&self) -> Cycle {
        self.last_adjustment
    }

    /// Whether an evaluation at `now` would be skipped.
    pub fn cooling_down(&self, now: Cycle) -> bool {
        now.saturating_sub(self.last_adjustment) < self.policy.cooldown
    }

    /// Evaluate at cycle `now`. Any decision other than `NoChange` resets
    /// the cooldown timer; the caller is expected to act on it.
    pub fn evaluate(
        &mut self,
        now: Cycle,
        queue_len: usize,
        workers: usize,
        last_idle: bool,
    ) -> ScaleDecision {
        if self.cooling_down(now) {
            return ScaleDecision::NoChange;
        }

        let decision = self.policy.decide(queue_len, workers, last_idle);
        if decision != ScaleDecision::NoChange {
            trace!(now, queue_len, workers, ?decision, "cooldown reset");
            self.last_adjustment = now;
        }
        decision
    }
}
