//! Shared types used across loadgrid crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A discrete simulation time step.
pub type Cycle = u64;

/// Stable identifier of a worker within one balancer.
pub type WorkerId = u32;

/// Category of work a request carries.
///
/// Stored as metadata only; scheduling treats both kinds the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Processing,
    Streaming,
}

impl JobType {
    pub fn label(&self) -> &'static str {
        match self {
            JobType::Processing => "processing",
            JobType::Streaming => "streaming",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A synthetic request travelling through the farm.
///
/// Immutable once built. Owned by the queue until dispatched, then by
/// exactly one worker until its service time runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Origin address in dotted-quad form.
    pub origin: String,
    /// Destination address in dotted-quad form.
    pub destination: String,
    /// Cycles of work needed to complete the request.
    pub service_time: u32,
    pub job_type: JobType,
}

impl Request {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        service_time: u32,
        job_type: JobType,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            service_time,
            job_type,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({} cycles, {})",
            self.origin, self.destination, self.service_time, self.job_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_display_includes_route_and_cost() {
        let req = Request::new("10.0.0.1", "192.168.1.9", 7, JobType::Streaming);
        assert_eq!(req.to_string(), "10.0.0.1 -> 192.168.1.9 (7 cycles, streaming)");
    }

    #[test]
    fn job_type_serializes_snake_case() {
        let req = Request::new("1.2.3.4", "5.6.7.8", 3, JobType::Processing);
        let toml_str = toml::to_string(&req).unwrap();
        assert!(toml_str.contains("job_type = \"processing\""));
    }
}
