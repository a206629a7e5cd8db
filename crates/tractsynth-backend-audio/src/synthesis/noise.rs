//! Band-limited Gaussian noise.

use rand_pcg::Pcg32;

use crate::filter::StateVariableFilter;
use crate::rng::normal;

/// Standard deviation of the white noise fed into the bandpass.
const NOISE_SIGMA: f64 = 1.0 / 6.0;
/// Resonance of the bandpass; wide and non-resonant.
const NOISE_Q: f64 = 0.5;

/// Gaussian white noise through a fixed bandpass filter.
#[derive(Debug, Clone)]
pub struct BandNoiseGenerator {
    bandpass: StateVariableFilter,
}

impl BandNoiseGenerator {
    /// Creates a generator centered on `normalized_cutoff` cycles per sample.
    pub fn new(normalized_cutoff: f64) -> Self {
        Self {
            bandpass: StateVariableFilter::new(normalized_cutoff, NOISE_Q),
        }
    }

    /// Draws one noise sample. Consumes two values from `rng`.
    #[inline]
    pub fn process(&mut self, rng: &mut Pcg32) -> f64 {
        self.bandpass
            .process_bandpass(normal(rng, 0.0, NOISE_SIGMA))
    }
}
