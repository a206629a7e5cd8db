//! Tests for stereo merge.

use super::*;

#[test]
fn test_full_merge_is_mono() {
    let mut left = vec![1.0, 0.0, -0.5];
    let mut right = vec![0.0, 1.0, 0.5];
    stereo_merge(&mut left, &mut right, 1.0);
    assert_eq!(left, right);
    assert_eq!(left, vec![0.5, 0.5, 0.0]);
}

#[test]
fn test_zero_merge_is_noop() {
    let mut left = vec![1.0, 0.0];
    let mut right = vec![0.0, 1.0];
    stereo_merge(&mut left, &mut right, 0.0);
    assert_eq!(left, vec![1.0, 0.0]);
    assert_eq!(right, vec![0.0, 1.0]);
}

#[test]
fn test_partial_merge_preserves_sum() {
    let mut left = vec![0.8, -0.2];
    let mut right = vec![-0.4, 0.6];
    stereo_merge(&mut left, &mut right, 0.5);
    assert!((left[0] - 0.5).abs() < 1e-12);
    assert!((right[0] + 0.1).abs() < 1e-12);
    for i in 0..2 {
        let before = [0.8 + -0.4, -0.2 + 0.6][i];
        assert!((left[i] + right[i] - before).abs() < 1e-12);
    }
}

#[test]
fn test_length_mismatch_is_ignored() {
    let mut left = vec![1.0, 1.0];
    let mut right = vec![0.0];
    stereo_merge(&mut left, &mut right, 1.0);
    assert_eq!(left, vec![1.0, 1.0]);
    assert_eq!(right, vec![0.0]);
}
