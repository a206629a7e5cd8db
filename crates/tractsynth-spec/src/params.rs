//! Render request types.
//!
//! A [`TractParams`] value is a complete snapshot of everything one render
//! needs. Field names serialize in camelCase (`sampleRate`, `vocalTractDiameter`,
//! `tongue0X`, ...), and every field has a default so a request only has to
//! carry what it changes.

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::profile::{default_nose_diameter, default_vocal_tract_diameter};

/// Oversampling factor for the per-sample voice model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Oversample {
    /// Synthesize directly at the output rate.
    #[default]
    X1,
    /// Synthesize at twice the output rate, one half-band decimator stage.
    X2,
    /// Synthesize at 16 times the output rate, lowpass + half-band decimation.
    X16,
}

impl Oversample {
    /// Returns the integer oversampling factor.
    pub fn factor(self) -> u32 {
        match self {
            Oversample::X1 => 1,
            Oversample::X2 => 2,
            Oversample::X16 => 16,
        }
    }
}

impl TryFrom<u32> for Oversample {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Oversample::X1),
            2 => Ok(Oversample::X2),
            16 => Ok(Oversample::X16),
            other => Err(format!("overSample must be 1, 2, or 16, got {}", other)),
        }
    }
}

impl From<Oversample> for u32 {
    fn from(value: Oversample) -> Self {
        value.factor()
    }
}

/// Peak normalization applied after all channels are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NormalizeMode {
    /// Leave the synthesized level untouched.
    None,
    /// Divide every channel by the peak across all channels.
    Link,
    /// Divide each channel by its own peak.
    #[default]
    PerChannel,
}

/// One tongue hump: center position, height, and half-width on the
/// normalized oral-cavity axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TongueHump {
    /// Center of the hump in [0, 1].
    pub x: f64,
    /// Height of the hump; 1 fully closes the tract at the apex.
    pub y: f64,
    /// Half-width (radius) of the hump.
    pub width: f64,
}

/// Uniform jitter amplitudes for a [`TongueHump`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TongueJitter {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Parameters for one vocal-tract ensemble render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TractParams {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Render length in seconds.
    pub render_duration: f64,
    /// Declick fade-in length in seconds.
    pub fade_in: f64,
    /// Declick fade-out length in seconds.
    pub fade_out: f64,
    /// Gain reached at the end of the render by the exponential decay envelope.
    pub exp_decay_to: f64,
    /// Oversampling factor (1, 2, or 16).
    pub over_sample: Oversample,
    /// Base RNG seed.
    pub seed: u64,
    /// Channel index; only used to diversify the RNG seed.
    pub channel: u32,
    /// Number of channels rendered by a full render (1 or 2).
    pub channels: u32,

    /// Glottal frequency in Hz.
    pub frequency: f64,
    /// Squared glottal pulse width.
    pub sigma2: f64,
    /// Breathiness; 0 is fully voiced.
    pub noise_mix: f64,
    /// Vibrato depth in cents.
    pub vibrato_amount: f64,
    /// Mean vibrato hold period in seconds.
    pub vibrato_period: f64,

    /// Vocal tract diameters from glottis to lips.
    pub vocal_tract_diameter: Vec<f64>,
    /// Nose diameters from velum to nostrils.
    pub nose_diameter: Vec<f64>,
    /// Multiplier applied to the tongue-shaped part of the tract.
    pub tube_diameter_multiplier: f64,
    pub tongue0_x: f64,
    pub tongue0_y: f64,
    pub tongue0_w: f64,
    pub tongue1_x: f64,
    pub tongue1_y: f64,
    pub tongue1_w: f64,
    /// Reflection coefficient at the glottal end of the tract.
    pub glottal_reflection: f64,
    /// Reflection coefficient at the lip end of the tract.
    pub lip_reflection: f64,
    /// Enables the three-port nasal junction. Experimental: known to be unstable.
    pub nasal_coupling: bool,

    /// Number of voices in the ensemble.
    pub n_voice: u32,
    /// Per-voice detune range in cents.
    pub random_detune: f64,
    /// Per-voice pulse width jitter in octaves.
    pub random_pulse_width: f64,
    pub random_tongue0_x: f64,
    pub random_tongue0_y: f64,
    pub random_tongue0_w: f64,
    pub random_tongue1_x: f64,
    pub random_tongue1_y: f64,
    pub random_tongue1_w: f64,

    /// Stereo cross-blend amount in [0, 1]; 1 merges to mono.
    pub stereo_merge: f64,
    /// Peak normalization mode.
    pub normalize: NormalizeMode,
}

impl Default for TractParams {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            render_duration: 1.0,
            fade_in: 0.001,
            fade_out: 0.002,
            exp_decay_to: 1.0,
            over_sample: Oversample::X1,
            seed: 0,
            channel: 0,
            channels: 1,

            frequency: 150.0,
            sigma2: 0.03,
            noise_mix: 0.05,
            vibrato_amount: 100.0,
            vibrato_period: 0.05,

            vocal_tract_diameter: default_vocal_tract_diameter(),
            nose_diameter: default_nose_diameter(),
            tube_diameter_multiplier: 1.0,
            tongue0_x: 0.25,
            tongue0_y: 0.7,
            tongue0_w: 0.4,
            tongue1_x: 0.9,
            tongue1_y: 0.6,
            tongue1_w: 0.1,
            glottal_reflection: 0.75,
            lip_reflection: -0.85,
            nasal_coupling: false,

            n_voice: 8,
            random_detune: 10.0,
            random_pulse_width: 0.01,
            random_tongue0_x: 0.1,
            random_tongue0_y: 0.2,
            random_tongue0_w: 0.05,
            random_tongue1_x: 0.1,
            random_tongue1_y: 0.2,
            random_tongue1_w: 0.05,

            stereo_merge: 0.0,
            normalize: NormalizeMode::PerChannel,
        }
    }
}

impl TractParams {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the request to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of output samples per channel, `floor(sampleRate * renderDuration)`.
    pub fn num_samples(&self) -> usize {
        (self.sample_rate as f64 * self.render_duration).floor().max(0.0) as usize
    }

    /// Sample rate the voice model runs at.
    pub fn up_rate(&self) -> f64 {
        self.sample_rate as f64 * self.over_sample.factor() as f64
    }

    /// Voiced/breathy balance derived from `noiseMix`; 1 is fully tense.
    pub fn tenseness(&self) -> f64 {
        1.0 - ((1.0 - self.noise_mix) * std::f64::consts::FRAC_PI_2).cos()
    }

    /// Gain of the aspiration noise component.
    pub fn noise_gain(&self) -> f64 {
        1.0 - self.tenseness().sqrt()
    }

    /// Gain of the Gaussian glottal pulse.
    pub fn pulse_gain(&self) -> f64 {
        0.08 * self.tenseness().powf(0.25)
    }

    /// Base glottal pulse width before per-voice jitter.
    pub fn sigma(&self) -> f64 {
        self.sigma2.sqrt()
    }

    /// The two tongue humps with their jitter amplitudes.
    pub fn tongue_humps(&self) -> [(TongueHump, TongueJitter); 2] {
        [
            (
                TongueHump {
                    x: self.tongue0_x,
                    y: self.tongue0_y,
                    width: self.tongue0_w,
                },
                TongueJitter {
                    x: self.random_tongue0_x,
                    y: self.random_tongue0_y,
                    width: self.random_tongue0_w,
                },
            ),
            (
                TongueHump {
                    x: self.tongue1_x,
                    y: self.tongue1_y,
                    width: self.tongue1_w,
                },
                TongueJitter {
                    x: self.random_tongue1_x,
                    y: self.random_tongue1_y,
                    width: self.random_tongue1_w,
                },
            ),
        ]
    }

    /// Returns a copy addressed to another channel.
    pub fn for_channel(&self, channel: u32) -> Self {
        Self {
            channel,
            ..self.clone()
        }
    }
}
