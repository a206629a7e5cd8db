//! Default diameter profiles for the vocal tract and the nasal tube.
//!
//! Profiles are ordered from the glottis (index 0) to the lips or nostrils
//! (last index). Each entry is a section diameter in arbitrary but consistent
//! units; only area ratios between neighbors matter to the waveguide.

/// Number of nodes in the default vocal tract profile.
pub const VOCAL_TRACT_NODES: usize = 44;

/// Number of nodes in the default nose profile.
pub const NOSE_NODES: usize = 28;

/// Largest diameter allowed in the default nose profile.
const NOSE_MAX_DIAMETER: f64 = 1.9;

/// Returns the default vocal tract diameter profile.
///
/// A narrow glottal region (0.6) opens to the pharynx (1.1) and then to a wide
/// oral cavity (1.5), where the tongue humps are later carved in.
pub fn default_vocal_tract_diameter() -> Vec<f64> {
    (0..VOCAL_TRACT_NODES)
        .map(|i| match i {
            0..=6 => 0.6,
            7..=11 => 1.1,
            _ => 1.5,
        })
        .collect()
}

/// Returns the default nose diameter profile.
///
/// The profile rises linearly from the velum, peaks in the middle of the nasal
/// cavity, and narrows towards the nostrils.
pub fn default_nose_diameter() -> Vec<f64> {
    (0..NOSE_NODES)
        .map(|idx| {
            let dd = 2.0 * (idx as f64 / NOSE_NODES as f64);
            let diameter = if dd < 1.0 {
                0.4 + 1.6 * dd
            } else {
                0.5 + 1.5 * (2.0 - dd)
            };
            diameter.min(NOSE_MAX_DIAMETER)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocal_tract_profile_shape() {
        let profile = default_vocal_tract_diameter();
        assert_eq!(profile.len(), VOCAL_TRACT_NODES);
        assert_eq!(profile[0], 0.6);
        assert_eq!(profile[6], 0.6);
        assert_eq!(profile[7], 1.1);
        assert_eq!(profile[11], 1.1);
        assert_eq!(profile[12], 1.5);
        assert_eq!(profile[VOCAL_TRACT_NODES - 1], 1.5);
    }

    #[test]
    fn test_nose_profile_shape() {
        let profile = default_nose_diameter();
        assert_eq!(profile.len(), NOSE_NODES);
        assert!((profile[0] - 0.4).abs() < 1e-12);
        assert!(profile.iter().all(|&d| d > 0.0 && d <= NOSE_MAX_DIAMETER));
        // Peak is clipped in the middle of the cavity.
        assert_eq!(profile[NOSE_NODES / 2], NOSE_MAX_DIAMETER);
    }

    #[test]
    fn test_nose_shorter_than_tract() {
        assert!(default_nose_diameter().len() < default_vocal_tract_diameter().len());
    }
}
