//! Frequency response checks of the oversampling decimators.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::TAU;
use tractsynth_backend_audio::filter::OversamplePipeline;
use tractsynth_spec::Oversample;

const SETTLE: usize = 2048;
const WINDOW: usize = 4096;

/// Peak spectral magnitude of the decimated output of a unit sine.
///
/// `cycles` is the tone frequency in cycles per oversampled input sample.
fn decimated_peak(over_sample: Oversample, cycles: f64) -> f64 {
    let mut pipeline = OversamplePipeline::new(over_sample);
    let mut n = 0usize;
    let mut tone = || {
        let s = (TAU * cycles * n as f64).sin();
        n += 1;
        s
    };

    for _ in 0..SETTLE {
        pipeline.next_sample(&mut tone);
    }
    let mut buffer: Vec<Complex<f64>> = (0..WINDOW)
        .map(|i| {
            let hann = 0.5 - 0.5 * (TAU * i as f64 / WINDOW as f64).cos();
            Complex::new(pipeline.next_sample(&mut tone) * hann, 0.0)
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(WINDOW).process(&mut buffer);
    buffer[..WINDOW / 2]
        .iter()
        .map(|c| c.norm())
        .fold(0.0, f64::max)
}

#[test]
fn test_half_band_rejects_aliasing_tone() {
    let pass = decimated_peak(Oversample::X2, 0.05);
    let stop = decimated_peak(Oversample::X2, 0.4);
    assert!(pass > 0.0);
    assert!(stop / pass < 0.01, "attenuation too small: {}", stop / pass);
}

#[test]
fn test_sixteen_fold_rejects_aliasing_tone() {
    let pass = decimated_peak(Oversample::X16, 0.1 / 16.0);
    let stop = decimated_peak(Oversample::X16, 0.3);
    assert!(pass > 0.0);
    assert!(stop / pass < 0.01, "attenuation too small: {}", stop / pass);
}

#[test]
fn test_passband_gain_is_close_to_unity() {
    let direct = decimated_peak(Oversample::X1, 0.05);
    let half = decimated_peak(Oversample::X2, 0.025);
    let ratio = half / direct;
    assert!((ratio - 1.0).abs() < 0.05, "passband gain {}", ratio);
}
