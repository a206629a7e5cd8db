//! A single voice of the ensemble.
//!
//! A voice is a glottal oscillator driving a shaped vocal tract, with vibrato
//! from a random line and frication noise injected at the tongue constriction.
//! Voices are built fresh for every render and never outlive it.

use rand_pcg::Pcg32;
use tracing::trace;

use tractsynth_spec::TractParams;

use crate::error::AudioResult;
use crate::modulation::RandomLine;
use crate::rng::{uniform, unit};
use crate::synthesis::{
    shape_tract, BandNoiseGenerator, GlottalOscillator, NasalJunction, Tube,
};

/// Center of the frication noise band in Hz.
const FRICATION_HZ: f64 = 1000.0;
/// Level of the frication noise before windowing.
const FRICATION_GAIN: f64 = 0.05;
/// Lip reflection used for the nose outlet.
const NOSTRIL_REFLECTION: f64 = -0.85;

/// Per-request settings shared by every voice.
#[derive(Debug, Clone, Copy)]
struct Articulation {
    up_rate: f64,
    vibrato_amount: f64,
    tenseness: f64,
    pulse_gain: f64,
    noise_gain: f64,
    lip_reflection: f64,
    glottal_reflection: f64,
}

/// One voice of the ensemble.
#[derive(Debug, Clone)]
pub struct Voice {
    articulation: Articulation,
    frequency: f64,
    sigma: f64,
    vibrato: RandomLine,
    osc: GlottalOscillator,
    frication: BandNoiseGenerator,
    tract: Tube,
    nose: Tube,
    junction: Option<NasalJunction>,
    turbulence_x: f64,
    turbulence_diameter: f64,
}

impl Voice {
    /// Builds a voice, drawing its random settings from `rng`.
    ///
    /// Draw order: vibrato targets, oscillator phase, detune, pulse width,
    /// tract scale, tongue jitter.
    ///
    /// # Errors
    /// Fails with an invalid geometry error if either diameter profile
    /// cannot form a tube.
    pub fn new(params: &TractParams, rng: &mut Pcg32) -> AudioResult<Self> {
        let up_rate = params.up_rate();
        let articulation = Articulation {
            up_rate,
            vibrato_amount: params.vibrato_amount,
            tenseness: params.tenseness(),
            pulse_gain: params.pulse_gain(),
            noise_gain: params.noise_gain(),
            lip_reflection: params.lip_reflection,
            glottal_reflection: params.glottal_reflection,
        };

        let vibrato = RandomLine::new(up_rate, params.vibrato_period * up_rate, rng);
        let osc = GlottalOscillator::new(up_rate, unit(rng));
        let detune = uniform(rng, -1.0, 1.0) * params.random_detune / 600.0;
        let frequency = params.frequency * 2f64.powf(detune);
        let width = uniform(rng, -1.0, 1.0) * params.random_pulse_width;
        let sigma = params.sigma() * 2f64.powf(width);

        let nose = Tube::new(&params.nose_diameter)?;
        let frication = BandNoiseGenerator::new(FRICATION_HZ / up_rate);

        let shaped = shape_tract(params, rng);
        let tract = Tube::new(&shaped.diameter)?;

        let junction = if params.nasal_coupling {
            NasalJunction::new(&tract, &nose)
        } else {
            None
        };

        trace!(
            frequency,
            sigma,
            turbulence_x = shaped.turbulence_x,
            turbulence_diameter = shaped.turbulence_diameter,
            nasal = junction.is_some(),
            "voice ready"
        );

        Ok(Self {
            articulation,
            frequency,
            sigma,
            vibrato,
            osc,
            frication,
            tract,
            nose,
            junction,
            turbulence_x: shaped.turbulence_x,
            turbulence_diameter: shaped.turbulence_diameter,
        })
    }

    /// Detuned base frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Jittered glottal pulse width.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// The shaped vocal tract.
    pub fn tract(&self) -> &Tube {
        &self.tract
    }

    /// Returns true if the nose is coupled to the tract.
    pub fn is_nasal(&self) -> bool {
        self.junction.is_some()
    }

    /// Returns true if every tube holds finite waves.
    pub fn is_finite(&self) -> bool {
        self.tract.is_finite() && self.nose.is_finite()
    }

    /// Clears the waveguide state and re-seats the oscillator after a
    /// divergence.
    pub fn recover(&mut self) {
        self.tract.reset();
        self.nose.reset();
        self.osc.recover();
    }

    #[cfg(test)]
    pub(crate) fn tract_mut(&mut self) -> &mut Tube {
        &mut self.tract
    }

    /// Produces one sample at the oversampled rate.
    pub fn process(&mut self, rng: &mut Pcg32) -> f64 {
        let a = self.articulation;
        let vibrato = 2f64.powf(self.vibrato.process(rng) * a.vibrato_amount / 1200.0);

        let excitation = self.osc.process(
            vibrato * self.frequency / a.up_rate,
            self.sigma,
            rng,
            a.pulse_gain,
            a.noise_gain,
            a.tenseness,
        );

        let frication = FRICATION_GAIN * self.frication.process(rng);
        self.tract.add_turbulence_noise_at_index(
            frication,
            self.turbulence_x,
            self.turbulence_diameter,
            self.osc.modulation(),
        );
        let mut sig = self
            .tract
            .process_full(excitation, a.lip_reflection, a.glottal_reflection);

        if let Some(junction) = &self.junction {
            junction.couple(&mut self.tract, &mut self.nose);
            sig += self.nose.process(0.0, NOSTRIL_REFLECTION);
        }

        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    fn short_params() -> TractParams {
        TractParams {
            render_duration: 0.05,
            ..TractParams::default()
        }
    }

    #[test]
    fn test_voice_determinism() {
        let params = short_params();
        let mut rng1 = create_rng(4);
        let mut rng2 = create_rng(4);
        let mut v1 = Voice::new(&params, &mut rng1).unwrap();
        let mut v2 = Voice::new(&params, &mut rng2).unwrap();
        for _ in 0..2000 {
            assert_eq!(v1.process(&mut rng1), v2.process(&mut rng2));
        }
    }

    #[test]
    fn test_detune_and_pulse_width_ranges() {
        let params = short_params();
        let mut rng = create_rng(10);
        for _ in 0..50 {
            let voice = Voice::new(&params, &mut rng).unwrap();
            let cents = 1200.0 * (voice.frequency() / params.frequency).log2();
            assert!(cents.abs() <= params.random_detune * 2.0 + 1e-9);
            let octaves = (voice.sigma() / params.sigma()).log2();
            assert!(octaves.abs() <= params.random_pulse_width + 1e-12);
        }
    }

    #[test]
    fn test_no_detune_keeps_frequency() {
        let params = TractParams {
            random_detune: 0.0,
            random_pulse_width: 0.0,
            ..short_params()
        };
        let voice = Voice::new(&params, &mut create_rng(1)).unwrap();
        assert_eq!(voice.frequency(), params.frequency);
        assert_eq!(voice.sigma(), params.sigma());
    }

    #[test]
    fn test_voice_output_finite() {
        let params = short_params();
        let mut rng = create_rng(77);
        let mut voice = Voice::new(&params, &mut rng).unwrap();
        for _ in 0..10_000 {
            assert!(voice.process(&mut rng).is_finite());
        }
        assert!(voice.is_finite());
    }

    #[test]
    fn test_nasal_coupling_is_opt_in() {
        let params = short_params();
        assert!(!Voice::new(&params, &mut create_rng(0)).unwrap().is_nasal());

        let params = TractParams {
            nasal_coupling: true,
            ..short_params()
        };
        let mut rng = create_rng(0);
        let mut voice = Voice::new(&params, &mut rng).unwrap();
        assert!(voice.is_nasal());
        for _ in 0..5000 {
            assert!(voice.process(&mut rng).is_finite());
        }
    }

    #[test]
    fn test_invalid_nose_is_rejected() {
        let params = TractParams {
            nose_diameter: vec![1.0],
            ..short_params()
        };
        assert!(Voice::new(&params, &mut create_rng(0)).is_err());
    }

    #[test]
    fn test_recover_clears_tubes() {
        let params = short_params();
        let mut rng = create_rng(5);
        let mut voice = Voice::new(&params, &mut rng).unwrap();
        for _ in 0..500 {
            voice.process(&mut rng);
        }
        assert!(voice.tract().energy() > 0.0);
        voice.recover();
        assert_eq!(voice.tract().energy(), 0.0);
    }

    #[test]
    fn test_recover_after_nan_in_tract() {
        let params = short_params();
        let mut rng = create_rng(6);
        let mut voice = Voice::new(&params, &mut rng).unwrap();
        voice.tract_mut().forward_mut().fill(f64::NAN);
        assert!(!voice.process(&mut rng).is_finite());

        voice.recover();
        let out: Vec<f64> = (0..2000).map(|_| voice.process(&mut rng)).collect();
        assert!(out.iter().all(|s| s.is_finite()));
        assert!(out.iter().any(|&s| s != 0.0));
    }
}
