//! Tongue shaping of the vocal tract.
//!
//! Each voice carves two tongue humps into the oral part of the base diameter
//! profile and then scales the whole tract by a random factor. The humps are
//! jittered independently at every tract node, so the resulting profile is a
//! slightly rough version of the requested articulation.

use rand_pcg::Pcg32;

use tractsynth_spec::{TongueHump, TongueJitter, TractParams};

use crate::rng::uniform;

/// First tract node the tongue can reach.
const TONGUE_START: usize = 12;
/// Nodes at the lip end the tongue never reaches.
const TONGUE_END_MARGIN: usize = 4;
/// Highest jittered hump height; the tract never fully closes.
const MAX_TONGUE_HEIGHT: f64 = 0.95;
/// Range of the global tract scale, in octaves either side of 1.
const SCALE_OCTAVES: f64 = 0.1;

/// Positive half of an ellipse centered at `tongue_x`.
///
/// Returns 0 outside `[tongue_x - radius, tongue_x + radius]` and for a
/// vanishing radius.
///
/// # Example
/// ```
/// use tractsynth_backend_audio::synthesis::tongue_func;
///
/// assert_eq!(tongue_func(0.5, 0.5, 1.0, 0.5), 1.0);
/// assert_eq!(tongue_func(0.3, 0.5, 1.0, 0.0), 0.0);
/// ```
pub fn tongue_func(x: f64, tongue_x: f64, tongue_y: f64, radius: f64) -> f64 {
    if radius.abs() < f64::EPSILON {
        return 0.0;
    }
    if x < tongue_x - radius || x > tongue_x + radius {
        return 0.0;
    }
    let dx = x - tongue_x;
    tongue_y * (radius * radius - dx * dx).max(0.0).sqrt() / radius
}

/// A voice's tract after tongue shaping.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedTract {
    /// Diameter profile of the tract.
    pub diameter: Vec<f64>,
    /// Fractional junction index where frication noise is injected.
    pub turbulence_x: f64,
    /// Diameter at the injection point; zero if it falls outside the tract.
    pub turbulence_diameter: f64,
}

/// Jittered hump parameters.
fn jitter(rng: &mut Pcg32, value: f64, amount: f64, max: f64) -> f64 {
    (value + uniform(rng, -amount, amount)).clamp(0.0, max)
}

fn jittered_hump(rng: &mut Pcg32, x: f64, hump: &TongueHump, amount: &TongueJitter) -> f64 {
    let tongue_x = jitter(rng, hump.x, amount.x, 1.0);
    let tongue_y = jitter(rng, hump.y, amount.y, MAX_TONGUE_HEIGHT);
    let width = jitter(rng, hump.width, amount.width, 1.0);
    tongue_func(x, tongue_x, tongue_y, width)
}

/// Derives one voice's tract from the request.
///
/// Draws the global scale first, then six jitter values per shaped node in
/// the order hump 0 x, y, width, hump 1 x, y, width.
pub fn shape_tract(params: &TractParams, rng: &mut Pcg32) -> ShapedTract {
    let mut diameter = params.vocal_tract_diameter.clone();
    let len = diameter.len();

    let scale = uniform(
        rng,
        2f64.powf(-SCALE_OCTAVES),
        2f64.powf(SCALE_OCTAVES),
    );

    let [(hump0, jitter0), (hump1, jitter1)] = params.tongue_humps();
    let span = len as f64 - (TONGUE_START + TONGUE_END_MARGIN) as f64;
    for i in TONGUE_START..len.saturating_sub(TONGUE_END_MARGIN) {
        let x = (i - TONGUE_START) as f64 / span;
        let y0 = jittered_hump(rng, x, &hump0, &jitter0);
        let y1 = jittered_hump(rng, x, &hump1, &jitter1);
        diameter[i] *= (1.0 - y0.max(y1)) * params.tube_diameter_multiplier;
    }
    for d in diameter.iter_mut() {
        *d *= scale;
    }

    let turbulence_x = span * params.tongue0_x + TONGUE_START as f64;
    let turbulence_diameter = if turbulence_x >= 0.0 {
        diameter
            .get(turbulence_x.floor() as usize)
            .copied()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    ShapedTract {
        diameter,
        turbulence_x,
        turbulence_diameter,
    }
}
