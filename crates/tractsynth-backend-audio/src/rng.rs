//! Deterministic RNG using PCG32 and the distribution maps the voice model draws from.
//!
//! All randomness in the backend flows through this module. Each channel render
//! owns exactly one stream; every voice of that render draws from it in a fixed
//! order, so a `(seed, channel)` pair always reproduces the same buffer.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f64::consts::TAU;
use tractsynth_spec::channel_seed;

/// Creates a PCG32 RNG from a 64-bit seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Creates the RNG shared by all voices of one channel render.
///
/// # Arguments
/// * `seed` - The request's base seed
/// * `channel` - Output channel index
pub fn create_channel_rng(seed: u64, channel: u32) -> Pcg32 {
    create_rng(channel_seed(seed, channel))
}

/// Draws a uniform value in `[0, 1)`.
#[inline]
pub fn unit(rng: &mut Pcg32) -> f64 {
    rng.gen::<f64>()
}

/// Maps a unit draw onto `[low, high)`.
#[inline]
pub fn uniform_map(u: f64, low: f64, high: f64) -> f64 {
    low + u * (high - low)
}

/// Draws a uniform value in `[low, high)`.
#[inline]
pub fn uniform(rng: &mut Pcg32, low: f64, high: f64) -> f64 {
    uniform_map(unit(rng), low, high)
}

/// Box-Muller map from two unit draws to a normal sample.
///
/// `1 - u1` keeps the logarithm finite for `u1` in `[0, 1)`.
#[inline]
pub fn normal_map(u1: f64, u2: f64, mu: f64, sigma: f64) -> f64 {
    sigma * (-2.0 * (1.0 - u1).ln()).sqrt() * (TAU * u2).cos() + mu
}

/// Draws a normal sample, consuming two unit draws.
#[inline]
pub fn normal(rng: &mut Pcg32, mu: f64, sigma: f64) -> f64 {
    let u1 = unit(rng);
    let u2 = unit(rng);
    normal_map(u1, u2, mu, sigma)
}
