//! Glottal source.
//!
//! A Gaussian pulse per period stands in for the glottal flow derivative.
//! Aspiration noise is mixed in, shaped by a half-wave rectified sine so that
//! breathy voices get noise bursts synchronized with the glottal cycle.

use rand_pcg::Pcg32;
use std::f64::consts::TAU;

use super::noise::BandNoiseGenerator;
use crate::rng::unit;

/// Center of the aspiration noise band in Hz.
const ASPIRATION_HZ: f64 = 500.0;
/// Modulation level of a fully tense voice.
const TENSE_MODULATION: f64 = 0.3;

/// Glottal pulse oscillator.
#[derive(Debug, Clone)]
pub struct GlottalOscillator {
    phase: f64,
    modulation: f64,
    aspiration: BandNoiseGenerator,
}

impl GlottalOscillator {
    /// Creates an oscillator.
    ///
    /// # Arguments
    /// * `sample_rate` - Rate the oscillator is processed at
    /// * `initial_phase` - Starting phase; only the fractional part is kept
    pub fn new(sample_rate: f64, initial_phase: f64) -> Self {
        Self {
            phase: initial_phase - initial_phase.floor(),
            modulation: 0.0,
            aspiration: BandNoiseGenerator::new(ASPIRATION_HZ / sample_rate),
        }
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Voiced/breathy blend of the last processed sample, in `[0.1, 0.3]`.
    ///
    /// The turbulence injector scales frication noise by this value.
    pub fn modulation(&self) -> f64 {
        self.modulation
    }

    /// Re-seats a phase that has stopped being finite and clears the blend.
    pub fn recover(&mut self) {
        if !self.phase.is_finite() {
            self.phase = 0.0;
        }
        self.modulation = 0.0;
    }

    /// Advances one sample.
    ///
    /// # Arguments
    /// * `freq` - Normalized frequency, cycles per sample
    /// * `sigma` - Pulse width
    /// * `rng` - The channel RNG
    /// * `pulse_gain` - Gain of the Gaussian pulse
    /// * `noise_gain` - Gain of the aspiration noise
    /// * `tenseness` - 0 is breathy, 1 is tense
    pub fn process(
        &mut self,
        freq: f64,
        sigma: f64,
        rng: &mut Pcg32,
        pulse_gain: f64,
        noise_gain: f64,
        tenseness: f64,
    ) -> f64 {
        self.phase += freq;
        self.phase -= self.phase.floor();

        let x = (12.0 * self.phase - 6.0) / sigma;
        let pulse = (-x * x).exp();

        let voiced = 0.1 + 0.2 * (TAU * self.phase).sin().max(0.0);
        self.modulation = voiced + tenseness * (TENSE_MODULATION - voiced);

        let level = self.modulation * (0.2 + 0.02 * unit(rng));
        let noise = level * self.aspiration.process(rng);

        pulse_gain * pulse + noise_gain * noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_initial_phase_is_wrapped() {
        let osc = GlottalOscillator::new(48000.0, 2.25);
        assert!((osc.phase() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_pulse_peaks_mid_cycle() {
        let mut rng = create_rng(1);
        // 100 samples per period, no noise.
        let mut osc = GlottalOscillator::new(48000.0, 0.0);
        let out: Vec<f64> = (0..100)
            .map(|_| osc.process(0.01, 0.17, &mut rng, 1.0, 0.0, 1.0))
            .collect();
        let (argmax, peak) = out
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
        // Phase after sample i is (i + 1) / 100; the peak sits at phase 0.5.
        assert_eq!(argmax, 49);
        assert!((peak - 1.0).abs() < 1e-9);
        assert!(out[0] < 1e-6);
    }

    #[test]
    fn test_recover_reseats_non_finite_phase() {
        let mut rng = create_rng(3);
        let mut osc = GlottalOscillator::new(48000.0, 0.0);
        assert!(!osc
            .process(f64::INFINITY, 0.17, &mut rng, 0.08, 0.5, 0.5)
            .is_finite());
        assert!(osc.phase().is_nan());

        osc.recover();
        assert_eq!(osc.phase(), 0.0);
        assert_eq!(osc.modulation(), 0.0);
        for _ in 0..100 {
            assert!(osc.process(0.01, 0.17, &mut rng, 0.08, 0.5, 0.5).is_finite());
        }
    }

    #[test]
    fn test_recover_keeps_finite_phase() {
        let mut rng = create_rng(4);
        let mut osc = GlottalOscillator::new(48000.0, 0.0);
        for _ in 0..37 {
            osc.process(0.01, 0.17, &mut rng, 0.08, 0.5, 0.5);
        }
        let phase = osc.phase();
        osc.recover();
        assert_eq!(osc.phase(), phase);
    }

    #[test]
    fn test_modulation_tracks_tenseness() {
        let mut rng = create_rng(2);
        let mut osc = GlottalOscillator::new(48000.0, 0.0);
        for _ in 0..50 {
            osc.process(0.013, 0.17, &mut rng, 0.08, 0.5, 1.0);
            assert!((osc.modulation() - TENSE_MODULATION).abs() < 1e-12);
        }
        for _ in 0..200 {
            osc.process(0.013, 0.17, &mut rng, 0.08, 0.5, 0.0);
            assert!((0.1..=0.3 + 1e-12).contains(&osc.modulation()));
        }
    }

    #[test]
    fn test_oscillator_output_bounded() {
        let mut rng = create_rng(3);
        let mut osc = GlottalOscillator::new(96000.0, 0.5);
        for _ in 0..10_000 {
            let v = osc.process(150.0 / 96000.0, 0.17, &mut rng, 0.08, 0.2, 0.5);
            assert!(v.is_finite());
            assert!(v.abs() < 0.5);
        }
    }
}
