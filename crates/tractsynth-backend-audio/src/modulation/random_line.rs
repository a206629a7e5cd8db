//! Piecewise-linear random LFO.

use rand_pcg::Pcg32;

use crate::rng::{normal, unit};

/// Standard deviation of the Gaussian targets before clamping.
const TARGET_SIGMA: f64 = 1.0 / 3.0;

/// Random line generator.
///
/// Output moves in straight lines between random targets in `[-1, 1]`. Each
/// segment lasts `-ln(1 - u) * period` samples, capped at `max_period`.
#[derive(Debug, Clone)]
pub struct RandomLine {
    counter: u64,
    hold: f64,
    period: f64,
    max_period: f64,
    /// Target the line is heading to.
    v0: f64,
    /// Value the current segment started from.
    v1: f64,
}

impl RandomLine {
    /// Creates a random line, drawing its first two targets from `rng`.
    ///
    /// # Arguments
    /// * `sample_rate` - Rate the line is processed at; also the longest segment
    /// * `period` - Mean segment length in samples
    /// * `rng` - The channel RNG
    pub fn new(sample_rate: f64, period: f64, rng: &mut Pcg32) -> Self {
        let v0 = Self::random_target(rng);
        let v1 = Self::random_target(rng);
        Self {
            // Forces a renewal on the first call.
            counter: u64::MAX - 1,
            hold: 0.0,
            period,
            max_period: sample_rate,
            v0,
            v1,
        }
    }

    fn random_target(rng: &mut Pcg32) -> f64 {
        normal(rng, 0.0, TARGET_SIGMA).clamp(-1.0, 1.0)
    }

    /// Advances one sample and returns a value in `[-1, 1]`.
    pub fn process(&mut self, rng: &mut Pcg32) -> f64 {
        self.counter = self.counter.saturating_add(1);
        if self.counter as f64 > self.hold {
            self.counter = 0;
            self.hold = (-(1.0 - unit(rng)).ln() * self.period).min(self.max_period);
            self.v1 = self.v0;
            self.v0 = Self::random_target(rng);
        }

        // A zero-length segment sits on its start value.
        let t = if self.hold > 0.0 {
            self.counter as f64 / self.hold
        } else {
            0.0
        };
        (self.v1 + t * (self.v0 - self.v1)).clamp(-1.0, 1.0)
    }
}
