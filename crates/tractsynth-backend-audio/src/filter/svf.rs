//! Trapezoidal state-variable filter.

use std::f64::consts::PI;

/// Lowest normalized cutoff accepted by [`StateVariableFilter::new`].
const MIN_CUTOFF: f64 = 1e-5;
/// Highest normalized cutoff, just under Nyquist where `tan` blows up.
const MAX_CUTOFF: f64 = 0.49998;

/// Outputs of one state-variable filter tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfOutput {
    pub lowpass: f64,
    pub bandpass: f64,
    pub highpass: f64,
}

/// Zero-delay-feedback state-variable filter.
///
/// The cutoff is normalized to the sample rate (`hz / sample_rate`) and fixed
/// at construction.
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    g: f64,
    k: f64,
    ic1: f64,
    ic2: f64,
}

impl StateVariableFilter {
    /// Creates a filter.
    ///
    /// # Arguments
    /// * `normalized_cutoff` - Cutoff in cycles per sample, clamped below Nyquist
    /// * `q` - Resonance; 0.5 gives a wide, non-resonant band
    pub fn new(normalized_cutoff: f64, q: f64) -> Self {
        let cutoff = normalized_cutoff.clamp(MIN_CUTOFF, MAX_CUTOFF);
        Self {
            g: (cutoff * PI).tan(),
            k: 1.0 / q,
            ic1: 0.0,
            ic2: 0.0,
        }
    }

    /// Advances the filter by one sample.
    #[inline]
    pub fn tick(&mut self, input: f64) -> SvfOutput {
        let v1 = (self.ic1 + self.g * (input - self.ic2)) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2 + self.g * v1;
        self.ic1 = 2.0 * v1 - self.ic1;
        self.ic2 = 2.0 * v2 - self.ic2;
        SvfOutput {
            lowpass: v2,
            bandpass: v1,
            highpass: input - self.k * v1 - v2,
        }
    }

    /// Advances the filter and returns the bandpass output.
    #[inline]
    pub fn process_bandpass(&mut self, input: f64) -> f64 {
        self.tick(input).bandpass
    }

    /// Clears the integrator state.
    pub fn reset(&mut self) {
        self.ic1 = 0.0;
        self.ic2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady_state_gain(filter: &mut StateVariableFilter, freq: f64) -> f64 {
        let n = 8192;
        let mut peak = 0.0_f64;
        for i in 0..n {
            let x = (2.0 * PI * freq * i as f64).sin();
            let y = filter.process_bandpass(x);
            if i > n / 2 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn test_bandpass_peaks_at_center() {
        let center = 1000.0 / 48000.0;
        let at_center = steady_state_gain(&mut StateVariableFilter::new(center, 0.5), center);
        let below = steady_state_gain(&mut StateVariableFilter::new(center, 0.5), center / 20.0);
        let above = steady_state_gain(&mut StateVariableFilter::new(center, 0.5), 0.4);
        assert!(at_center > below, "{} vs {}", at_center, below);
        assert!(at_center > above, "{} vs {}", at_center, above);
        // With k = 1/q the bandpass gain at the center is q.
        assert!((at_center - 0.5).abs() < 0.02, "center gain {}", at_center);
    }

    #[test]
    fn test_bandpass_rejects_dc() {
        let mut filter = StateVariableFilter::new(0.01, 0.5);
        let mut last = 1.0;
        for _ in 0..20_000 {
            last = filter.process_bandpass(1.0);
        }
        assert!(last.abs() < 1e-6);
    }

    #[test]
    fn test_extreme_cutoff_is_clamped() {
        let mut filter = StateVariableFilter::new(0.5, 0.5);
        for _ in 0..1000 {
            assert!(filter.process_bandpass(1.0).is_finite());
        }
        let mut filter = StateVariableFilter::new(0.0, 0.5);
        assert!(filter.process_bandpass(1.0).is_finite());
    }

    #[test]
    fn test_reset() {
        let mut filter = StateVariableFilter::new(0.02, 0.5);
        let first = filter.process_bandpass(1.0);
        filter.process_bandpass(0.3);
        filter.reset();
        assert_eq!(filter.process_bandpass(1.0), first);
    }

    #[test]
    fn test_outputs_sum_to_input() {
        let mut filter = StateVariableFilter::new(0.05, 0.5);
        for i in 0..64 {
            let x = (i as f64 * 0.37).sin();
            let out = filter.tick(x);
            let sum = out.lowpass + out.bandpass / 0.5 + out.highpass;
            assert!((sum - x).abs() < 1e-12);
        }
    }
}
