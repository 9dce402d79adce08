//! loadgrid-balancer: clocked worker pool with queue-pressure autoscaling.
//!
//! The `LoadBalancer` owns the workers, the FIFO queue, the admission
//! filter and the scaling policy. The driver calls `submit()` for each
//! arriving request and `tick()` once per cycle.
//!
//! # Cycle
//!
//! ```text
//! tick():
//!     for w in workers: w.tick()            // finish work
//!     for w in workers:                     // dispatch, pool order
//!         if w.idle and queue: w.assign(queue.pop())
//!     if now - last_adjustment >= cooldown:
//!         Q = queue.len, S = workers.len
//!         if Q > high * S and S < max:              add worker
//!         elif Q < low * S and S > 1 and last idle: remove last worker
//!     now += 1
//! ```
//!
//! The order is fixed: a worker freed in the first pass is eligible for
//! dispatch in the same cycle, and scaling sees the queue after dispatch.

pub mod balancer;
pub mod error;
pub mod events;
pub mod queue;
pub mod scaler;
pub mod worker;

pub use balancer::{Admission, BalancerStats, LoadBalancer, TickOutcome};
pub use error::{BalancerError, BalancerResult};
pub use events::{EventSink, NoopSink, ScaleEvent, TracingSink};
pub use queue::RequestQueue;
pub use scaler::{Autoscaler, ScaleDecision, ScalingPolicy};
pub use worker::Worker;
