//! Fades, stereo merge and peak normalization.

use std::f64::consts::FRAC_PI_2;

use tractsynth_spec::NormalizeMode;

/// Quarter cosine fade, 0 at `t = 0` and 1 at `t = 1`.
#[inline]
fn fade_curve(t: f64) -> f64 {
    ((1.0 - t) * FRAC_PI_2).cos()
}

/// Number of samples touched by a fade of `fade_length` samples and the
/// length used to normalize the curve.
fn fade_span(fade_length: f64, len: usize) -> (usize, f64) {
    if !(fade_length > 0.0) {
        return (0, 0.0);
    }
    let length = fade_length.min(len as f64);
    (length.ceil() as usize, length)
}

/// Fades in the first `fade_length` samples.
///
/// # Arguments
/// * `samples` - Channel to fade in place
/// * `fade_length` - Fade length in samples, may be fractional
pub fn declick_in(samples: &mut [f64], fade_length: f64) {
    let (count, length) = fade_span(fade_length, samples.len());
    for (n, sample) in samples.iter_mut().take(count).enumerate() {
        *sample *= fade_curve(n as f64 / length);
    }
}

/// Fades out the last `fade_length` samples, mirroring [`declick_in`].
pub fn declick_out(samples: &mut [f64], fade_length: f64) {
    let (count, length) = fade_span(fade_length, samples.len());
    for (n, sample) in samples.iter_mut().rev().take(count).enumerate() {
        *sample *= fade_curve(n as f64 / length);
    }
}

/// Blends two channels towards each other.
///
/// `amount` is in `[0, 1]`: 0 leaves both channels intact and 1 makes them
/// identical. Channels of different length are left untouched.
pub fn stereo_merge(left: &mut [f64], right: &mut [f64], amount: f64) {
    if amount == 0.0 || left.len() != right.len() {
        return;
    }
    let amount = amount / 2.0;
    for (s0, s1) in left.iter_mut().zip(right.iter_mut()) {
        let (a, b) = (*s0, *s1);
        *s0 = a + amount * (b - a);
        *s1 = b + amount * (a - b);
    }
}

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

/// Root mean square of a buffer; 0 for an empty one.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Divides every channel by the peak across all channels.
///
/// Silent input is left as is.
pub fn normalize_link(channels: &mut [Vec<f64>]) {
    let current_peak = channels
        .iter()
        .map(|ch| peak(ch))
        .fold(0.0_f64, f64::max);

    if current_peak > 0.0 {
        for sample in channels.iter_mut().flat_map(|ch| ch.iter_mut()) {
            *sample /= current_peak;
        }
    }
}

/// Divides each channel by its own peak.
///
/// Channels whose peak is at or below machine epsilon are left as is.
pub fn normalize_per_channel(channels: &mut [Vec<f64>]) {
    for channel in channels.iter_mut() {
        let current_peak = peak(channel);
        if current_peak <= f64::EPSILON {
            continue;
        }
        for sample in channel.iter_mut() {
            *sample /= current_peak;
        }
    }
}

/// Applies a normalization mode.
pub fn normalize(channels: &mut [Vec<f64>], mode: NormalizeMode) {
    match mode {
        NormalizeMode::None => {}
        NormalizeMode::Link => normalize_link(channels),
        NormalizeMode::PerChannel => normalize_per_channel(channels),
    }
}
