//! Kelly-Lochbaum waveguide tube.
//!
//! A tube is a chain of cylindrical sections described by a diameter profile,
//! glottis (or velum) first. Each junction between neighboring sections
//! scatters the traveling waves according to the change in cross-sectional
//! area. The two ends reflect with coefficients supplied per call, which is
//! where all energy enters or leaves the line.

use std::f64::consts::PI;

use tractsynth_spec::validation::common::validate_diameter_profile;

use crate::error::{AudioError, AudioResult};

/// Reflection used where a section is fully closed.
pub const CLOSED_REFLECTION: f64 = 0.999;

/// Default lip reflection: a partially open mouth.
pub const DEFAULT_LIP_REFLECTION: f64 = -0.85;

/// Default glottal reflection: a mostly closed glottis.
pub const DEFAULT_GLOTTAL_REFLECTION: f64 = 0.75;

/// Largest diameter a tube accepts; keeps every section area finite.
const MAX_SECTION_DIAMETER: f64 = 1e150;

/// Largest turbulence window value for diameters at or below this size.
const THIN_DIAMETER: f64 = 0.7;
/// Diameter under which the tract is treated as fully closed for turbulence.
const CLOSED_DIAMETER: f64 = 0.3;

/// Reflection between two sections, `(a0 - a1) / (a0 + a1)` on their areas.
///
/// Works on the squared diameter ratio, so it cannot overflow. A closed
/// upstream section reflects with [`CLOSED_REFLECTION`].
pub fn junction_reflection(d0: f64, d1: f64) -> f64 {
    if d0 == 0.0 {
        return CLOSED_REFLECTION;
    }
    let r = if d0 <= d1 {
        let q = (d0 / d1).powi(2);
        (q - 1.0) / (q + 1.0)
    } else {
        let q = (d1 / d0).powi(2);
        (1.0 - q) / (1.0 + q)
    };
    r.clamp(-CLOSED_REFLECTION, CLOSED_REFLECTION)
}

/// Waveguide tube.
#[derive(Debug, Clone)]
pub struct Tube {
    area: Vec<f64>,
    reflection: Vec<f64>,
    buf_f: Vec<f64>,
    buf_b: Vec<f64>,
}

impl Tube {
    /// Creates a tube from a diameter profile.
    ///
    /// # Errors
    /// Returns [`AudioError::InvalidGeometry`] if the profile has fewer than two
    /// entries or any entry is negative, not finite or absurdly large.
    pub fn new(diameter: &[f64]) -> AudioResult<Self> {
        validate_diameter_profile("diameter", diameter, MAX_SECTION_DIAMETER)
            .map_err(|e| AudioError::invalid_geometry("diameter", e.message))?;

        let area: Vec<f64> = diameter.iter().map(|d| d * d * PI / 4.0).collect();
        let reflection = diameter
            .windows(2)
            .map(|pair| junction_reflection(pair[0], pair[1]))
            .collect();

        let n_section = diameter.len() - 1;
        Ok(Self {
            area,
            reflection,
            buf_f: vec![0.0; n_section],
            buf_b: vec![0.0; n_section],
        })
    }

    /// Number of junctions; one less than the number of diameters.
    pub fn n_section(&self) -> usize {
        self.reflection.len()
    }

    /// Cross-sectional area at each node.
    pub fn area(&self) -> &[f64] {
        &self.area
    }

    /// Reflection coefficient at each junction.
    pub fn reflection(&self) -> &[f64] {
        &self.reflection
    }

    /// Forward-traveling wave at each junction.
    pub fn forward(&self) -> &[f64] {
        &self.buf_f
    }

    /// Backward-traveling wave at each junction.
    pub fn backward(&self) -> &[f64] {
        &self.buf_b
    }

    pub(crate) fn forward_mut(&mut self) -> &mut [f64] {
        &mut self.buf_f
    }

    pub(crate) fn backward_mut(&mut self) -> &mut [f64] {
        &mut self.buf_b
    }

    /// Sum of squared wave amplitudes in both directions.
    pub fn energy(&self) -> f64 {
        self.buf_f
            .iter()
            .chain(self.buf_b.iter())
            .map(|v| v * v)
            .sum()
    }

    /// Returns true if every wave sample is finite.
    pub fn is_finite(&self) -> bool {
        self.buf_f
            .iter()
            .chain(self.buf_b.iter())
            .all(|v| v.is_finite())
    }

    /// Clears both wave buffers. Geometry is kept.
    pub fn reset(&mut self) {
        self.buf_f.fill(0.0);
        self.buf_b.fill(0.0);
    }

    /// Injects turbulence noise at a fractional junction index.
    ///
    /// The noise is split between the two neighboring junctions by the
    /// fractional offset and added equally to both directions. It is windowed by
    /// the local diameter: strongest where the tract is narrow but still open.
    /// Indices past the end of the tube receive nothing.
    pub fn add_turbulence_noise_at_index(
        &mut self,
        noise: f64,
        index: f64,
        diameter: f64,
        modulation: f64,
    ) {
        if !(index >= 0.0) {
            return;
        }
        let index_i = index.floor();
        let fraction = index - index_i;
        let noise = noise * modulation;

        let thinness = (8.0 * (THIN_DIAMETER - diameter)).clamp(0.0, 1.0);
        let openness = (30.0 * (diameter - CLOSED_DIAMETER)).clamp(0.0, 1.0);
        let noise0 = noise * (1.0 - fraction) * thinness * openness;
        let noise1 = noise * fraction * thinness * openness;

        let i = index_i as usize;
        self.inject(i, noise0 / 2.0);
        if let Some(next) = i.checked_add(1) {
            self.inject(next, noise1 / 2.0);
        }
    }

    #[inline]
    fn inject(&mut self, i: usize, amount: f64) {
        if let (Some(f), Some(b)) = (self.buf_f.get_mut(i), self.buf_b.get_mut(i)) {
            *f += amount;
            *b += amount;
        }
    }

    /// Advances one sample, feeding back part of the backward wave at the input.
    ///
    /// # Arguments
    /// * `input` - Excitation entering the first section
    /// * `output_end_reflection` - Reflection at the far end (lips)
    /// * `input_end_reflection` - Reflection at the input end (glottis)
    #[inline]
    pub fn process_full(
        &mut self,
        input: f64,
        output_end_reflection: f64,
        input_end_reflection: f64,
    ) -> f64 {
        let input = input + self.buf_b[0] * input_end_reflection;
        self.process(input, output_end_reflection)
    }

    /// Advances one sample and returns the wave leaving the far end.
    ///
    /// The returned value is also stored as the backward wave of the last
    /// junction, so it travels back towards the input on the next call.
    pub fn process(&mut self, input: f64, output_end_reflection: f64) -> f64 {
        let mut carry = input;
        std::mem::swap(&mut carry, &mut self.buf_f[0]);
        self.buf_f[0] -= self.reflection[0] * (self.buf_f[0] + self.buf_b[0]);

        for i in 1..self.n_section() {
            std::mem::swap(&mut carry, &mut self.buf_f[i]);
            let w = self.reflection[i] * (self.buf_f[i] + self.buf_b[i]);
            self.buf_f[i] -= w;
            self.buf_b[i - 1] = self.buf_b[i] + w;
        }

        let out = carry * output_end_reflection;
        let last = self.n_section() - 1;
        self.buf_b[last] = out;
        out
    }
}
