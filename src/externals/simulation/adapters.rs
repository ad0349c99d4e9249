use std::ops::Range;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{internals::core::ports::StatusSource, models::distance::DistanceToTarget};

use super::RECORDED_DESCENT_MM;

/// Produces a uniformly random distance on every read. Useful for exercising
/// a GUI without hardware or a host.
pub struct RandomStatusSource {
    rng: StdRng,
    range: Range<f32>,
}

impl RandomStatusSource {
    pub fn new(range: Range<f32>) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            range,
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(range: Range<f32>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range,
        }
    }
}

impl Default for RandomStatusSource {
    fn default() -> Self {
        Self::new(0f32..10f32)
    }
}

impl StatusSource for RandomStatusSource {
    fn read_distance_to_target(&mut self) -> DistanceToTarget {
        if self.range.is_empty() {
            return DistanceToTarget::UNKNOWN;
        }
        DistanceToTarget::from(self.rng.gen_range(self.range.clone()))
    }
}

/// Replays a fixed trace of readings, starting over once it runs out.
/// An empty trace always reads unknown.
pub struct ReplayStatusSource {
    trace: Vec<f32>,
    position: usize,
}

impl ReplayStatusSource {
    pub fn new(trace: Vec<f32>) -> Self {
        Self { trace, position: 0 }
    }

    pub fn recorded_descent() -> Self {
        Self::new(RECORDED_DESCENT_MM.to_vec())
    }

    /// Next reading in the trace.
    pub fn next_value(&mut self) -> Option<f32> {
        if self.trace.is_empty() {
            return None;
        }
        let value = self.trace[self.position];
        self.position = (self.position + 1) % self.trace.len();
        Some(value)
    }
}

impl StatusSource for ReplayStatusSource {
    fn read_distance_to_target(&mut self) -> DistanceToTarget {
        self.next_value()
            .map(DistanceToTarget::from)
            .unwrap_or(DistanceToTarget::UNKNOWN)
    }
}
