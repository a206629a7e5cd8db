//! Tests for peak normalization.

use super::*;
use tractsynth_spec::NormalizeMode;

#[test]
fn test_normalize_link_uses_global_peak() {
    let mut channels = vec![vec![0.5, -0.25], vec![0.1, -0.05]];
    normalize(&mut channels, NormalizeMode::Link);

    assert_eq!(channels[0], vec![1.0, -0.5]);
    assert!((channels[1][0] - 0.2).abs() < 1e-12);
    assert!((channels[1][1] + 0.1).abs() < 1e-12);
}

#[test]
fn test_normalize_per_channel() {
    let mut channels = vec![vec![0.5, -0.25], vec![0.1, -0.05]];
    normalize(&mut channels, NormalizeMode::PerChannel);

    assert!((peak(&channels[0]) - 1.0).abs() < 1e-12);
    assert!((peak(&channels[1]) - 1.0).abs() < 1e-12);
    assert!((channels[1][1] + 0.5).abs() < 1e-12);
}

#[test]
fn test_normalize_none_is_noop() {
    let mut channels = vec![vec![3.0, -2.0]];
    normalize(&mut channels, NormalizeMode::None);
    assert_eq!(channels, vec![vec![3.0, -2.0]]);
}

#[test]
fn test_normalize_silent_audio() {
    let mut channels = vec![vec![0.0; 4], vec![0.0; 4]];
    normalize(&mut channels, NormalizeMode::Link);
    assert!(channels.iter().flatten().all(|&s| s == 0.0));

    normalize(&mut channels, NormalizeMode::PerChannel);
    assert!(channels.iter().flatten().all(|&s| s == 0.0));
}

#[test]
fn test_per_channel_skips_near_silent_channel() {
    let mut channels = vec![vec![1e-17, -1e-17], vec![0.25]];
    normalize_per_channel(&mut channels);
    assert_eq!(channels[0], vec![1e-17, -1e-17]);
    assert_eq!(channels[1], vec![1.0]);
}

#[test]
fn test_normalize_loud_audio() {
    let mut channels = vec![vec![2.0, -1.5, 3.0, -2.5]];
    normalize_link(&mut channels);
    assert!((peak(&channels[0]) - 1.0).abs() < 1e-12);
}

#[test]
fn test_peak_and_rms() {
    assert_eq!(peak(&[]), 0.0);
    assert_eq!(rms(&[]), 0.0);
    assert_eq!(peak(&[0.1, -0.7, 0.3]), 0.7);
    assert!((rms(&[1.0, -1.0, 1.0, -1.0]) - 1.0).abs() < 1e-12);
}
