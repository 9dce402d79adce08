//! loadgrid-sim: drives a `LoadBalancer` with synthetic traffic.
//!
//! A run prefills the queue with `initialServers * 100` generated
//! requests, then ticks the balancer for `simulationLength` cycles,
//! submitting one new request whenever the randomized arrival schedule
//! comes due.
//!
//! All randomness comes from `ChaCha8Rng` streams seeded from the config,
//! so a given config always produces the same run.

pub mod error;
pub mod generator;
pub mod report;
pub mod runner;

pub use error::{SimError, SimResult};
pub use generator::RequestGenerator;
pub use report::SimulationReport;
pub use runner::Simulation;
