//! End-of-run summary.

use std::fmt;

use loadgrid_balancer::LoadBalancer;
use loadgrid_core::Cycle;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub total_cycles: Cycle,
    /// Queue length after prefill, before the first tick.
    pub starting_queue: usize,
    pub final_queue: usize,
    pub final_workers: usize,
    pub scale_ups: u64,
    pub scale_downs: u64,
    pub scaling_events: u64,
    pub blocked_requests: u64,
    pub completed_requests: u64,
    /// `final_queue / final_workers`, 0 with no workers.
    pub avg_queue_per_worker: usize,
}

impl SimulationReport {
    pub fn from_balancer(
        total_cycles: Cycle,
        starting_queue: usize,
        balancer: &LoadBalancer,
    ) -> Self {
        let stats = balancer.stats();
        let final_queue = balancer.queue_len();
        let final_workers = balancer.worker_count();
        Self {
            total_cycles,
            starting_queue,
            final_queue,
            final_workers,
            scale_ups: stats.scale_ups,
            scale_downs: stats.scale_downs,
            scaling_events: stats.scaling_events(),
            blocked_requests: stats.blocked,
            completed_requests: stats.completed,
            avg_queue_per_worker: final_queue.checked_div(final_workers).unwrap_or(0),
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "SIMULATION SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total Cycles: {}", self.total_cycles)?;
        writeln!(f, "Starting Queue Size: {}", self.starting_queue)?;
        writeln!(f, "Ending Queue Size: {}", self.final_queue)?;
        writeln!(f, "Final Server Count: {}", self.final_workers)?;
        writeln!(
            f,
            "Total Scaling Events: {} ({} up, {} down)",
            self.scaling_events, self.scale_ups, self.scale_downs
        )?;
        writeln!(f, "Blocked Requests (Firewall): {}", self.blocked_requests)?;
        writeln!(f, "Completed Requests: {}", self.completed_requests)?;
        writeln!(f, "Average Queue per Server: {}", self.avg_queue_per_worker)?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadgrid_balancer::ScalingPolicy;
    use loadgrid_core::{JobType, Request};
    use loadgrid_firewall::AdmissionFilter;

    fn balancer_with_queue(workers: u32, queued: usize) -> LoadBalancer {
        let policy = ScalingPolicy {
            high_threshold: u32::MAX,
            low_threshold: 0,
            max_workers: workers,
            cooldown: 0,
        };
        let mut lb = LoadBalancer::new(policy, workers, AdmissionFilter::new());
        for _ in 0..queued {
            lb.submit(Request::new("1.2.3.4", "4.3.2.1", 5, JobType::Processing))
                .unwrap();
        }
        lb
    }

    #[test]
    fn average_uses_integer_division() {
        let report = SimulationReport::from_balancer(10, 7, &balancer_with_queue(3, 7));
        assert_eq!(report.final_queue, 7);
        assert_eq!(report.final_workers, 3);
        assert_eq!(report.avg_queue_per_worker, 2);
    }

    #[test]
    fn display_renders_summary_block() {
        let report = SimulationReport::from_balancer(500, 4, &balancer_with_queue(2, 4));
        let text = report.to_string();
        assert!(text.contains("SIMULATION SUMMARY"));
        assert!(text.contains("Total Cycles: 500"));
        assert!(text.contains("Final Server Count: 2"));
        assert!(text.contains("Blocked Requests (Firewall): 0"));
    }

    #[test]
    fn serializes_to_json() {
        let report = SimulationReport::from_balancer(1, 0, &balancer_with_queue(1, 0));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_cycles"], 1);
        assert_eq!(json["final_workers"], 1);
        assert_eq!(json["scaling_events"], 0);
    }
}
