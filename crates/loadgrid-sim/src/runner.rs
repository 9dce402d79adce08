//! The simulation clock loop.

use loadgrid_balancer::{Admission, EventSink, LoadBalancer, NoopSink, TickOutcome};
use loadgrid_core::{Cycle, SimulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::SimResult;
use crate::generator::RequestGenerator;
use crate::report::SimulationReport;

/// Requests generated per initial worker before the clock starts.
pub const INITIAL_QUEUE_PER_WORKER: u64 = 100;

/// ChaCha stream used for arrival delays, separate from request contents.
const ARRIVAL_STREAM: u64 = 1;

pub struct Simulation {
    config: SimulationConfig,
    balancer: LoadBalancer,
    generator: RequestGenerator<ChaCha8Rng>,
    arrivals: ChaCha8Rng,
    cycle: Cycle,
    next_arrival: Cycle,
    starting_queue: usize,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::with_sink(config, Box::new(NoopSink))
    }

    /// Build a simulation whose balancer reports to `sink`.
    pub fn with_sink(config: SimulationConfig, sink: Box<dyn EventSink>) -> SimResult<Self> {
        // Validation also guarantees the delay range is non-empty.
        config.validate()?;

        let balancer = LoadBalancer::from_config(&config)?.with_sink(sink);
        let generator = RequestGenerator::seeded(config.seed, config.processing_range())?;

        let mut arrivals = ChaCha8Rng::seed_from_u64(config.seed);
        arrivals.set_stream(ARRIVAL_STREAM);
        let next_arrival = Cycle::from(arrivals.random_range(config.delay_range()));

        Ok(Self {
            config,
            balancer,
            generator,
            arrivals,
            cycle: 0,
            next_arrival,
            starting_queue: 0,
        })
    }

    /// Fill the queue with `initialServers * 100` requests. Returns the
    /// resulting queue length, which excludes blocked requests.
    pub fn prefill(&mut self) -> SimResult<usize> {
        let count = u64::from(self.config.initial_servers) * INITIAL_QUEUE_PER_WORKER;
        for _ in 0..count {
            self.balancer.submit(self.generator.generate())?;
        }
        self.starting_queue = self.balancer.queue_len();
        info!(
            generated = count,
            queued = self.starting_queue,
            blocked = self.balancer.blocked_request_count(),
            "initial queue generated"
        );
        Ok(self.starting_queue)
    }

    /// Advance one cycle: tick the balancer, then submit an arrival if
    /// one is due and schedule the next.
    pub fn step(&mut self) -> SimResult<TickOutcome> {
        let outcome = self.balancer.tick()?;

        if self.cycle >= self.next_arrival {
            let admission = self.balancer.submit(self.generator.generate())?;
            let delay = Cycle::from(self.arrivals.random_range(self.config.delay_range()));
            self.next_arrival = self.cycle + delay;
            if admission == Admission::Queued {
                debug!(cycle = self.cycle, next = self.next_arrival, "request arrived");
            }
        }

        self.cycle += 1;
        Ok(outcome)
    }

    /// Prefill, then step `simulationLength` cycles.
    pub fn run(&mut self) -> SimResult<SimulationReport> {
        info!(
            initial_servers = self.config.initial_servers,
            max_servers = self.config.max_servers,
            cycles = self.config.simulation_length,
            processing_min = self.config.request_processing_min,
            processing_max = self.config.request_processing_max,
            seed = self.config.seed,
            "simulation starting"
        );

        self.prefill()?;
        for _ in 0..self.config.simulation_length {
            self.step()?;
        }

        let report = self.report();
        info!(
            final_queue = report.final_queue,
            final_workers = report.final_workers,
            scaling_events = report.scaling_events,
            blocked = report.blocked_requests,
            "simulation complete"
        );
        Ok(report)
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport::from_balancer(self.cycle, self.starting_queue, &self.balancer)
    }

    pub fn balancer(&self) -> &LoadBalancer {
        &self.balancer
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Cycles stepped so far.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    pub fn next_arrival(&self) -> Cycle {
        self.next_arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            initial_servers: 2,
            max_servers: 6,
            simulation_length: 200,
            seed: 11,
            request_delay_min: 1,
            request_delay_max: 1,
            request_processing_min: 3,
            request_processing_max: 9,
            queue_low_threshold: 5,
            queue_high_threshold: 20,
            server_adjustment_delay: 10,
            blocked_ips: String::new(),
        }
    }

    #[test]
    fn prefill_queues_one_hundred_per_worker() {
        let mut sim = Simulation::new(small_config()).unwrap();
        assert_eq!(sim.prefill().unwrap(), 200);
        assert_eq!(sim.balancer().queue_len(), 200);
        assert_eq!(sim.balancer().clock(), 0);
    }

    #[test]
    fn fixed_delay_arrives_every_cycle_after_first() {
        let mut config = small_config();
        // Blocking everything makes arrivals countable without dispatch noise.
        config.blocked_ips = "0.0.0.0/0".to_string();
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.next_arrival(), 1);

        for _ in 0..10 {
            sim.step().unwrap();
        }
        // Cycles 1 through 9 each produced one arrival.
        assert_eq!(sim.balancer().blocked_request_count(), 9);
        assert_eq!(sim.cycle(), 10);
    }

    #[test]
    fn balancer_and_driver_clocks_agree() {
        let mut sim = Simulation::new(small_config()).unwrap();
        for expected in 0..25 {
            assert_eq!(sim.step().unwrap().cycle, expected);
        }
        assert_eq!(sim.balancer().clock(), sim.cycle());
    }

    #[test]
    fn run_reports_configured_length() {
        let mut sim = Simulation::new(small_config()).unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.total_cycles, 200);
        assert_eq!(report.starting_queue, 200);
        assert!(report.final_workers >= 1 && report.final_workers <= 6);
        assert!(report.completed_requests > 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.max_servers = 1;
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::Config(_))
        ));

        let mut config = small_config();
        config.blocked_ips = "300.1.1.1".to_string();
        assert!(matches!(
            Simulation::new(config),
            Err(SimError::Balancer(_))
        ));
    }
}
