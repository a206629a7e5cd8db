//! Guard against non-finite voice output.

/// Replaces non-finite samples and counts how often it had to.
#[derive(Debug, Clone, Default)]
pub struct Stabilizer {
    count: usize,
}

impl Stabilizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes finite samples through; NaN becomes 0 and infinities saturate
    /// to `±1`.
    #[inline]
    pub fn stabilize(&mut self, sample: f64) -> f64 {
        if sample.is_finite() {
            return sample;
        }
        self.count += 1;
        if sample.is_nan() {
            0.0
        } else {
            sample.signum()
        }
    }

    /// Number of samples replaced so far.
    pub fn count(&self) -> usize {
        self.count
    }
}
