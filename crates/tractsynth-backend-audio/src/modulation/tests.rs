//! Random line unit tests.

use super::random_line::*;
use crate::rng::create_rng;

#[test]
fn test_random_line_determinism() {
    let mut rng1 = create_rng(42);
    let mut rng2 = create_rng(42);

    let mut line1 = RandomLine::new(48000.0, 2400.0, &mut rng1);
    let mut line2 = RandomLine::new(48000.0, 2400.0, &mut rng2);

    let samples1: Vec<f64> = (0..10_000).map(|_| line1.process(&mut rng1)).collect();
    let samples2: Vec<f64> = (0..10_000).map(|_| line2.process(&mut rng2)).collect();

    assert_eq!(samples1, samples2);
}

#[test]
fn test_random_line_moves_smoothly() {
    let mut rng = create_rng(5);
    let mut line = RandomLine::new(48000.0, 4800.0, &mut rng);

    let samples: Vec<f64> = (0..48_000).map(|_| line.process(&mut rng)).collect();
    let distinct = samples
        .windows(2)
        .filter(|w| (w[0] - w[1]).abs() > 0.0)
        .count();
    assert!(distinct > 1000, "line barely moved: {}", distinct);

    // Steps inside a long segment are small.
    let small_steps = samples
        .windows(2)
        .filter(|w| (w[0] - w[1]).abs() < 0.01)
        .count();
    assert!(small_steps > samples.len() * 9 / 10);
}

#[test]
fn test_zero_period_stays_finite() {
    let mut rng = create_rng(9);
    let mut line = RandomLine::new(48000.0, 0.0, &mut rng);
    for _ in 0..1000 {
        let v = line.process(&mut rng);
        assert!(v.is_finite());
        assert!((-1.0..=1.0).contains(&v));
    }
}

#[test]
fn test_segments_capped_by_sample_rate() {
    let mut rng = create_rng(13);
    // Huge mean period; every segment is clipped to 100 samples.
    let mut line = RandomLine::new(100.0, 1e9, &mut rng);
    let samples: Vec<f64> = (0..1000).map(|_| line.process(&mut rng)).collect();
    let mut renewals = 0;
    // A renewal restarts at the previous target, so the slope changes.
    for w in samples.windows(3) {
        let d0 = w[1] - w[0];
        let d1 = w[2] - w[1];
        if (d0 - d1).abs() > 1e-9 {
            renewals += 1;
        }
    }
    assert!(renewals >= 8, "renewals {}", renewals);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn random_line_output_is_bounded(
            seed in any::<u64>(),
            period in 0.0f64..10_000.0,
            rate in 1.0f64..192_000.0,
        ) {
            let mut rng = create_rng(seed);
            let mut line = RandomLine::new(rate, period, &mut rng);
            for _ in 0..2000 {
                let v = line.process(&mut rng);
                prop_assert!((-1.0..=1.0).contains(&v), "out of range: {}", v);
            }
        }
    }
}
