//! Main entry point for rendering.
//!
//! [`render_voices`] produces one channel: it builds the voice ensemble from a
//! single channel RNG, runs it through the oversampling pipeline and applies
//! the exponential decay envelope. [`render`] runs one such render per output
//! channel on scoped threads and finalizes the result.

mod stabilizer;


use rand_pcg::Pcg32;
use tracing::{debug, warn};

use tractsynth_spec::{validate_params, TractParams};

use crate::error::{AudioError, AudioResult};
use crate::filter::OversamplePipeline;
use crate::mixer;
use crate::rng::create_channel_rng;
use crate::voice::Voice;

pub use stabilizer::Stabilizer;

/// One rendered channel before post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRender {
    /// Samples at the output rate.
    pub samples: Vec<f64>,
    /// Voice samples that had to be replaced because they were not finite.
    pub stabilized_samples: usize,
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderStats {
    /// Largest absolute sample over all channels.
    pub peak: f64,
    /// RMS over all channels.
    pub rms: f64,
    /// Voice samples that had to be replaced because they were not finite.
    pub stabilized_samples: usize,
}

/// Result of a multi-channel render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// One buffer per channel, all the same length.
    pub channels: Vec<Vec<f64>>,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// BLAKE3 hash of the interleaved little-endian `f64` samples.
    pub pcm_hash: String,
    /// Level and stability summary.
    pub stats: RenderStats,
}

/// Validates a request, logging its warnings.
///
/// # Errors
/// Returns [`AudioError::Validation`] carrying every validation error.
pub fn ensure_valid(params: &TractParams) -> AudioResult<()> {
    let result = validate_params(params);
    for warning in &result.warnings {
        warn!(code = warning.code.code(), "{}", warning);
    }
    result.into_result().map(|_| ()).map_err(AudioError::from)
}

/// Renders one channel of the voice ensemble.
///
/// The output is not normalized or faded; see [`render`] for the finished
/// product.
///
/// # Errors
/// Fails if the request does not validate.
pub fn render_voices(params: &TractParams) -> AudioResult<Vec<f64>> {
    render_channel(params).map(|channel| channel.samples)
}

/// Renders one channel and reports how many samples had to be stabilized.
///
/// # Errors
/// Fails if the request does not validate.
pub fn render_channel(params: &TractParams) -> AudioResult<ChannelRender> {
    ensure_valid(params)?;

    let num_samples = params.num_samples();
    debug!(
        seed = params.seed,
        channel = params.channel,
        voices = params.n_voice,
        over_sample = params.over_sample.factor(),
        num_samples,
        "rendering channel"
    );

    let mut rng = create_channel_rng(params.seed, params.channel);
    let mut voices = (0..params.n_voice)
        .map(|_| Voice::new(params, &mut rng))
        .collect::<AudioResult<Vec<_>>>()?;

    let mut pipeline = OversamplePipeline::new(params.over_sample);
    let mut stabilizer = Stabilizer::new();
    let mut samples = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let sample = pipeline.next_sample(|| sum_voices(&mut voices, &mut rng, &mut stabilizer));
        samples.push(sample);
    }

    apply_decay_envelope(&mut samples, params.exp_decay_to);

    let stabilized_samples = stabilizer.count();
    if stabilized_samples > 0 {
        warn!(
            channel = params.channel,
            stabilized_samples, "voice output diverged and was stabilized"
        );
    }
    debug!(channel = params.channel, "channel finished");

    Ok(ChannelRender {
        samples,
        stabilized_samples,
    })
}

/// Sums one oversampled sample over the ensemble.
fn sum_voices(voices: &mut [Voice], rng: &mut Pcg32, stabilizer: &mut Stabilizer) -> f64 {
    let mut output = 0.0;
    for voice in voices.iter_mut() {
        let sample = voice.process(rng);
        if !sample.is_finite() {
            voice.recover();
        }
        output += stabilizer.stabilize(sample);
    }
    output
}

/// Multiplies the buffer by `exp_decay_to^(n / len)`.
///
/// The gain starts at 1 and is updated multiplicatively, so the last sample
/// sits one step above `exp_decay_to`.
pub fn apply_decay_envelope(samples: &mut [f64], exp_decay_to: f64) {
    if samples.is_empty() {
        return;
    }
    let decay = exp_decay_to.powf(1.0 / samples.len() as f64);
    let mut gain = 1.0;
    for sample in samples.iter_mut() {
        *sample *= gain;
        gain *= decay;
    }
}

/// Renders every channel of a request and finalizes the result.
///
/// Channel `i` renders with channel index `params.channel + i`, so each one
/// draws from its own RNG stream. Channels run concurrently and share no
/// state. The finished channels are faded, merged when stereo, and
/// normalized according to `params.normalize`.
///
/// # Errors
/// Fails if the request does not validate or a channel worker panics.
///
/// # Example
/// ```
/// use tractsynth_backend_audio::render;
/// use tractsynth_spec::TractParams;
///
/// let params = TractParams {
///     render_duration: 0.01,
///     n_voice: 2,
///     ..TractParams::default()
/// };
/// let output = render(&params).unwrap();
/// assert_eq!(output.channels.len(), 1);
/// assert_eq!(output.channels[0].len(), 480);
/// ```
pub fn render(params: &TractParams) -> AudioResult<RenderOutput> {
    ensure_valid(params)?;

    let channel_params: Vec<TractParams> = (0..params.channels)
        .map(|i| params.for_channel(params.channel.wrapping_add(i)))
        .collect();

    let renders: Vec<AudioResult<ChannelRender>> = std::thread::scope(|scope| {
        let handles: Vec<_> = channel_params
            .iter()
            .map(|p| scope.spawn(move || render_channel(p)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(AudioError::synthesis("channel worker panicked")))
            })
            .collect()
    });

    let mut channels = Vec::with_capacity(renders.len());
    let mut stabilized_samples = 0;
    for render in renders {
        let render = render?;
        stabilized_samples += render.stabilized_samples;
        channels.push(render.samples);
    }

    finalize(&mut channels, params);

    let all: Vec<f64> = channels.iter().flatten().copied().collect();
    let stats = RenderStats {
        peak: mixer::peak(&all),
        rms: mixer::rms(&all),
        stabilized_samples,
    };
    let pcm_hash = pcm_hash(&channels);

    debug!(
        channels = channels.len(),
        peak = stats.peak,
        rms = stats.rms,
        pcm_hash = %pcm_hash,
        "render finished"
    );

    Ok(RenderOutput {
        channels,
        sample_rate: params.sample_rate,
        pcm_hash,
        stats,
    })
}

/// Fades, merges and normalizes rendered channels in place.
fn finalize(channels: &mut [Vec<f64>], params: &TractParams) {
    let sample_rate = params.sample_rate as f64;
    for channel in channels.iter_mut() {
        mixer::declick_in(channel, params.fade_in * sample_rate);
        mixer::declick_out(channel, params.fade_out * sample_rate);
    }
    if let [left, right] = channels {
        mixer::stereo_merge(left, right, params.stereo_merge);
    }
    mixer::normalize(channels, params.normalize);
}

/// BLAKE3 hash over interleaved little-endian `f64` frames.
pub fn pcm_hash(channels: &[Vec<f64>]) -> String {
    let mut hasher = blake3::Hasher::new();
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            let sample = channel.get(i).copied().unwrap_or(0.0);
            hasher.update(&sample.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
