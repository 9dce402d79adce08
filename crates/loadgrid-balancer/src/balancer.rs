//! The load balancer: worker pool, FIFO queue, filter and autoscaler
//! driven one cycle at a time.

use loadgrid_core::{Cycle, Request, SimulationConfig, WorkerId};
use loadgrid_firewall::AdmissionFilter;
use serde::Serialize;
use tracing::debug;

use crate::error::BalancerResult;
use crate::events::{EventSink, NoopSink, ScaleEvent};
use crate::queue::RequestQueue;
use crate::scaler::{Autoscaler, ScaleDecision, ScalingPolicy};
use crate::worker::Worker;

/// Blocked requests between two sink notifications.
pub const DEFAULT_BLOCKED_REPORT_INTERVAL: u64 = 100;

/// What happened to a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended to the queue tail.
    Queued,
    /// Dropped by the admission filter.
    Blocked,
}

/// Observable result of one `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Cycle this tick ran as.
    pub cycle: Cycle,
    /// Requests that finished this cycle.
    pub completed: usize,
    /// Requests moved from the queue to a worker.
    pub dispatched: usize,
    pub decision: ScaleDecision,
}

/// Cumulative counters. Only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BalancerStats {
    pub admitted: u64,
    pub blocked: u64,
    pub dispatched: u64,
    pub completed: u64,
    pub scale_ups: u64,
    pub scale_downs: u64,
}

impl BalancerStats {
    pub fn scaling_events(&self) -> u64 {
        self.scale_ups + self.scale_downs
    }
}

pub struct LoadBalancer {
    workers: Vec<Worker>,
    queue: RequestQueue,
    filter: AdmissionFilter,
    autoscaler: Autoscaler,
    sink: Box<dyn EventSink>,
    clock: Cycle,
    /// Next id handed to a new worker. Ids are never reused.
    next_worker_id: WorkerId,
    blocked_report_interval: u64,
    stats: BalancerStats,
}

impl LoadBalancer {
    /// Create a balancer with `initial_workers` idle workers.
    pub fn new(policy: ScalingPolicy, initial_workers: u32, filter: AdmissionFilter) -> Self {
        let mut balancer = Self {
            workers: Vec::with_capacity(initial_workers as usize),
            queue: RequestQueue::new(),
            filter,
            autoscaler: Autoscaler::new(policy),
            sink: Box::new(NoopSink),
            clock: 0,
            next_worker_id: 0,
            blocked_report_interval: DEFAULT_BLOCKED_REPORT_INTERVAL,
            stats: BalancerStats::default(),
        };
        for _ in 0..initial_workers {
            balancer.push_worker();
        }
        balancer
    }

    /// Build from a simulation config, parsing its blocking rules.
    pub fn from_config(config: &SimulationConfig) -> BalancerResult<Self> {
        let filter = AdmissionFilter::from_rules(config.blocked_rules())?;
        Ok(Self::new(
            ScalingPolicy::from_config(config),
            config.initial_servers,
            filter,
        ))
    }

    /// Set the sink notified of scaling and blocking events.
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_blocked_report_interval(mut self, interval: u64) -> Self {
        self.blocked_report_interval = interval.max(1);
        self
    }

    /// Admit a request unless its origin is blocked.
    ///
    /// Blocking is not an error: it is counted and reported as
    /// `Admission::Blocked`. A malformed origin is an error.
    pub fn submit(&mut self, request: Request) -> BalancerResult<Admission> {
        if self.filter.is_blocked(&request.origin)? {
            self.stats.blocked += 1;
            if self.stats.blocked % self.blocked_report_interval == 0 {
                self.sink.requests_blocked(self.clock, self.stats.blocked);
            }
            return Ok(Admission::Blocked);
        }

        self.queue.push(request);
        self.stats.admitted += 1;
        Ok(Admission::Queued)
    }

    /// Run one cycle: advance workers, dispatch, evaluate scaling, then
    /// advance the clock.
    pub fn tick(&mut self) -> BalancerResult<TickOutcome> {
        let mut completed = 0;
        for worker in &mut self.workers {
            if worker.tick() {
                completed += 1;
            }
        }

        let mut dispatched = 0;
        for worker in &mut self.workers {
            if self.queue.is_empty() {
                break;
            }
            if !worker.is_idle() {
                continue;
            }
            let request = self.queue.pop()?;
            worker.assign(request)?;
            dispatched += 1;
            // Zero-duration work finishes inside `assign`.
            if worker.is_idle() {
                completed += 1;
            }
        }

        self.stats.completed += completed as u64;
        self.stats.dispatched += dispatched as u64;

        let decision = self.evaluate_scaling();

        let outcome = TickOutcome {
            cycle: self.clock,
            completed,
            dispatched,
            decision,
        };
        self.clock += 1;
        Ok(outcome)
    }

    fn evaluate_scaling(&mut self) -> ScaleDecision {
        let queue_len = self.queue.len();
        let last_idle = self.workers.last().is_some_and(Worker::is_idle);
        let decision =
            self.autoscaler
                .evaluate(self.clock, queue_len, self.workers.len(), last_idle);

        match decision {
            ScaleDecision::ScaleUp => {
                let worker_id = self.push_worker();
                self.stats.scale_ups += 1;
                self.sink.scaled_up(&ScaleEvent {
                    cycle: self.clock,
                    worker_id,
                    workers: self.workers.len(),
                    queue_len,
                });
            }
            ScaleDecision::ScaleDown => {
                if let Some(worker) = self.workers.pop() {
                    self.stats.scale_downs += 1;
                    self.sink.scaled_down(&ScaleEvent {
                        cycle: self.clock,
                        worker_id: worker.id(),
                        workers: self.workers.len(),
                        queue_len,
                    });
                }
            }
            ScaleDecision::NoChange => {}
        }

        decision
    }

    fn push_worker(&mut self) -> WorkerId {
        let id = self.next_worker_id;
        self.next_worker_id += 1;
        self.workers.push(Worker::new(id));
        id
    }

    /// Take the queue head directly, bypassing dispatch.
    pub fn next_request(&mut self) -> BalancerResult<Request> {
        self.queue.pop()
    }

    /// Manually add a worker. Returns `None` at the pool limit.
    pub fn add_worker(&mut self) -> Option<WorkerId> {
        if self.workers.len() >= self.autoscaler.policy().max_workers as usize {
            return None;
        }
        let id = self.push_worker();
        debug!(worker = id, workers = self.workers.len(), "worker added");
        Some(id)
    }

    /// Manually remove the last worker if it is idle and not the only one.
    pub fn remove_worker(&mut self) -> Option<WorkerId> {
        if self.workers.len() <= 1 || !self.workers.last().is_some_and(Worker::is_idle) {
            return None;
        }
        let worker = self.workers.pop()?;
        debug!(worker = worker.id(), workers = self.workers.len(), "worker removed");
        Some(worker.id())
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Scale-ups plus scale-downs made by the autoscaler.
    pub fn scaling_event_count(&self) -> u64 {
        self.stats.scaling_events()
    }

    pub fn blocked_request_count(&self) -> u64 {
        self.stats.blocked
    }

    pub fn completed_request_count(&self) -> u64 {
        self.stats.completed
    }

    /// Cycle the next `tick()` will run as.
    pub fn clock(&self) -> Cycle {
        self.clock
    }

    pub fn stats(&self) -> &BalancerStats {
        &self.stats
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn filter(&self) -> &AdmissionFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut AdmissionFilter {
        &mut self.filter
    }
}
