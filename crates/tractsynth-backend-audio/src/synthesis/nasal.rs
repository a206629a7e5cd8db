//! Three-port junction between the vocal tract and the nose.
//!
//! The nose branches off the tract so that its far end lines up with the
//! lips: the junction sits at `tract.n_section() - nose.n_section() - 1`.
//! Coupling is experimental and disabled unless a request sets
//! `nasalCoupling`; with it enabled the feedback through the nose can grow
//! without bound, so every port is clamped to `[-1, 1]`.

use super::tube::Tube;

/// Damping applied to the junction pressure, `EPSILON^(1 / 65536)`.
fn junction_decay() -> f64 {
    f64::EPSILON.powf(1.0 / 65536.0)
}

/// Scattering junction coupling the tract and the nose.
#[derive(Debug, Clone)]
pub struct NasalJunction {
    nose_index: usize,
    reflection_f: f64,
    reflection_b: f64,
    reflection_n: f64,
    decay: f64,
}

impl NasalJunction {
    /// Builds the junction for a tract and nose pair.
    ///
    /// Returns `None` when the nose is not at least two nodes shorter than the
    /// tract, or when all three branches are closed. Coupling such a pair is a
    /// no-op.
    pub fn new(tract: &Tube, nose: &Tube) -> Option<Self> {
        let nose_index = tract
            .n_section()
            .checked_sub(nose.n_section())?
            .checked_sub(1)?;
        // The junction reads the backward wave one section upstream.
        if nose_index < 1 {
            return None;
        }

        let area_f = tract.area()[nose_index];
        let area_b = tract.area()[nose_index + 1];
        let area_n = nose.area()[0];
        let area_s = area_f + area_b + area_n;
        if area_s.abs() <= f64::EPSILON {
            return None;
        }

        Some(Self {
            nose_index,
            reflection_f: (2.0 * area_f - area_s) / area_s,
            reflection_b: (2.0 * area_b - area_s) / area_s,
            reflection_n: (2.0 * area_n - area_s) / area_s,
            decay: junction_decay(),
        })
    }

    /// Tract junction index the nose attaches to.
    pub fn nose_index(&self) -> usize {
        self.nose_index
    }

    /// Port reflection coefficients, front, back and nose.
    pub fn reflections(&self) -> [f64; 3] {
        [self.reflection_f, self.reflection_b, self.reflection_n]
    }

    /// Scatters the waves meeting at the junction.
    ///
    /// Must be given the same tract and nose the junction was built from.
    pub fn couple(&self, tract: &mut Tube, nose: &mut Tube) {
        let ni = self.nose_index;
        let amp_f = tract.forward()[ni];
        let amp_b = tract.backward()[ni - 1];
        let amp_n = nose.forward()[0];

        let amp_s = self.decay * (amp_f + amp_b + amp_n);
        let out_f = (1.0 + self.reflection_f) * amp_s - amp_f;
        let out_b = (1.0 + self.reflection_b) * amp_s - amp_b;
        let out_n = (1.0 + self.reflection_n) * amp_s - amp_n;

        tract.forward_mut()[ni] = clamp_port(out_f);
        tract.backward_mut()[ni - 1] = clamp_port(out_b);
        nose.forward_mut()[0] = clamp_port(out_n);
    }
}

/// Clamps a port sample into the stable range, mapping NaN to silence.
#[inline]
fn clamp_port(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
