//! Balancer error types.

use loadgrid_core::WorkerId;
use loadgrid_firewall::FilterError;
use thiserror::Error;

/// Errors that can occur inside the balancer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalancerError {
    #[error("worker {0} is busy")]
    WorkerBusy(WorkerId),

    #[error("request queue is empty")]
    QueueEmpty,

    #[error("admission filter error: {0}")]
    Filter(#[from] FilterError),
}

pub type BalancerResult<T> = Result<T, BalancerError>;
