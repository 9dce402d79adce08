//! Synthetic request generation.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use loadgrid_core::{JobType, Request};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{SimError, SimResult};

/// Produces random requests from a random source it owns.
///
/// Addresses are four uniform octets; service time is uniform over the
/// configured range; job type is a fair coin.
#[derive(Debug, Clone)]
pub struct RequestGenerator<R> {
    rng: R,
    processing: RangeInclusive<u32>,
}

impl<R: Rng> RequestGenerator<R> {
    pub fn new(rng: R, processing: RangeInclusive<u32>) -> SimResult<Self> {
        if processing.is_empty() {
            return Err(SimError::EmptyRange {
                name: "processing time",
                min: *processing.start(),
                max: *processing.end(),
            });
        }
        Ok(Self { rng, processing })
    }

    pub fn generate(&mut self) -> Request {
        let origin = self.random_address();
        let destination = self.random_address();
        let service_time = self.rng.random_range(self.processing.clone());
        let job_type = if self.rng.random_bool(0.5) {
            JobType::Processing
        } else {
            JobType::Streaming
        };
        Request::new(origin, destination, service_time, job_type)
    }

    fn random_address(&mut self) -> String {
        let octets: [u8; 4] = self.rng.random();
        Ipv4Addr::from(octets).to_string()
    }
}

impl RequestGenerator<ChaCha8Rng> {
    /// Generator backed by a ChaCha8 stream seeded with `seed`.
    pub fn seeded(seed: u64, processing: RangeInclusive<u32>) -> SimResult<Self> {
        Self::new(ChaCha8Rng::seed_from_u64(seed), processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_requests() {
        let mut a = RequestGenerator::seeded(99, 1..=50).unwrap();
        let mut b = RequestGenerator::seeded(99, 1..=50).unwrap();
        for _ in 0..100 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn service_time_stays_in_range() {
        let mut generator = RequestGenerator::seeded(1, 10..=20).unwrap();
        for _ in 0..1_000 {
            let req = generator.generate();
            assert!((10..=20).contains(&req.service_time), "{}", req.service_time);
        }
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut generator = RequestGenerator::seeded(1, 7..=7).unwrap();
        assert!((0..50).all(|_| generator.generate().service_time == 7));
    }

    #[test]
    fn addresses_are_dotted_quads() {
        let mut generator = RequestGenerator::seeded(5, 1..=1).unwrap();
        for _ in 0..100 {
            let req = generator.generate();
            assert!(req.origin.parse::<Ipv4Addr>().is_ok(), "{}", req.origin);
            assert!(req.destination.parse::<Ipv4Addr>().is_ok(), "{}", req.destination);
        }
    }

    #[test]
    fn both_job_types_appear() {
        let mut generator = RequestGenerator::seeded(3, 1..=1).unwrap();
        let kinds: Vec<_> = (0..200).map(|_| generator.generate().job_type).collect();
        assert!(kinds.contains(&JobType::Processing));
        assert!(kinds.contains(&JobType::Streaming));
    }

    #[test]
    fn empty_range_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let err = RequestGenerator::seeded(1, 5..=4).unwrap_err();
        assert!(matches!(err, SimError::EmptyRange { min: 5, max: 4, .. }));
    }
}
