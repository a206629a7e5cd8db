//! Tests for fade in and fade out.

use super::*;

#[test]
fn test_declick_in_curve() {
    let mut samples = vec![1.0; 8];
    declick_in(&mut samples, 4.0);

    assert!(samples[0].abs() < 1e-12);
    assert!((samples[2] - (std::f64::consts::FRAC_PI_4).cos()).abs() < 1e-12);
    // Fade is monotonic and untouched after its end.
    assert!(samples[0] < samples[1] && samples[1] < samples[2] && samples[2] < samples[3]);
    assert!(samples[4..].iter().all(|&s| s == 1.0));
}

#[test]
fn test_declick_out_mirrors_in() {
    let mut fade_in = vec![1.0; 16];
    let mut fade_out = vec![1.0; 16];
    declick_in(&mut fade_in, 5.0);
    declick_out(&mut fade_out, 5.0);

    let reversed: Vec<f64> = fade_out.iter().rev().copied().collect();
    assert_eq!(fade_in, reversed);
}

#[test]
fn test_fade_longer_than_buffer() {
    let mut samples = vec![1.0; 4];
    declick_in(&mut samples, 100.0);
    assert!(samples[0].abs() < 1e-12);
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples[3] < 1.0);
}

#[test]
fn test_fractional_fade_length() {
    let mut samples = vec![1.0; 10];
    declick_in(&mut samples, 2.5);
    // Samples 0, 1 and 2 are inside the fade.
    assert!(samples[2] < 1.0);
    assert_eq!(samples[3], 1.0);
}

#[test]
fn test_zero_fade_is_noop() {
    let mut samples = vec![0.5; 4];
    declick_in(&mut samples, 0.0);
    declick_out(&mut samples, 0.0);
    declick_in(&mut samples, f64::NAN);
    assert_eq!(samples, vec![0.5; 4]);

    let mut empty: Vec<f64> = Vec::new();
    declick_in(&mut empty, 10.0);
    declick_out(&mut empty, 10.0);
    assert!(empty.is_empty());
}
