//! Simulation error types.

use loadgrid_balancer::BalancerError;
use loadgrid_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("balancer error: {0}")]
    Balancer(#[from] BalancerError),

    #[error("empty {name} range: {min}..={max}")]
    EmptyRange {
        name: &'static str,
        min: u32,
        max: u32,
    },
}

pub type SimResult<T> = Result<T, SimError>;
