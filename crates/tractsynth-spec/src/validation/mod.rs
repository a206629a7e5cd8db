//! Render request validation.
//!
//! Validation runs before any sample is produced. Errors make the request
//! unusable; warnings flag settings that render but may not sound as intended.

pub mod common;


use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::params::TractParams;

use common::{
    validate_diameter_profile, validate_finite, validate_non_negative, validate_positive,
    validate_range, validate_unit_interval, CommonValidationError,
};

/// Lowest supported output sample rate in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
/// Highest supported output sample rate in Hz.
pub const MAX_SAMPLE_RATE: u32 = 192_000;
/// Longest supported render in seconds.
pub const MAX_RENDER_DURATION_SECONDS: f64 = 100.0;
/// Largest supported ensemble.
pub const MAX_VOICES: u32 = 32;
/// Largest supported channel count.
pub const MAX_CHANNELS: u32 = 2;
/// Largest diameter accepted in a request profile.
pub const MAX_DIAMETER: f64 = 10.0;
/// Largest tongue-region diameter multiplier, +20 dB.
pub const MAX_TUBE_DIAMETER_MULTIPLIER: f64 = 10.0;
/// Deepest vibrato in cents.
pub const MAX_VIBRATO_CENTS: f64 = 1200.0;

/// Validates a diameter profile, reporting the offending element path.
pub fn validate_geometry(path: &str, diameter: &[f64]) -> Result<(), ValidationError> {
    validate_diameter_profile(path, diameter, MAX_DIAMETER).map_err(|e| {
        let full_path = match e.index {
            Some(i) => format!("{}[{}]", path, i),
            None => path.to_string(),
        };
        ValidationError::with_path(ErrorCode::InvalidGeometry, e.message, full_path)
    })
}

/// Validates a complete render request.
///
/// # Example
/// ```
/// use tractsynth_spec::{validate_params, ErrorCode, TractParams};
///
/// let mut params = TractParams::default();
/// assert!(validate_params(&params).is_ok());
///
/// params.nose_diameter = vec![1.0];
/// let result = validate_params(&params);
/// assert!(result.has_error(ErrorCode::InvalidGeometry));
/// ```
pub fn validate_params(params: &TractParams) -> ValidationResult {
    let mut result = ValidationResult::success();

    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&params.sample_rate) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidSampleRate,
            format!(
                "sampleRate must be in [{}, {}], got {}",
                MIN_SAMPLE_RATE, MAX_SAMPLE_RATE, params.sample_rate
            ),
            "sampleRate",
        ));
    }

    if let Err(e) = validate_positive("renderDuration", params.render_duration) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            e.to_string(),
            "renderDuration",
        ));
    } else if params.render_duration > MAX_RENDER_DURATION_SECONDS {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDuration,
            format!(
                "renderDuration must be <= {}, got {}",
                MAX_RENDER_DURATION_SECONDS, params.render_duration
            ),
            "renderDuration",
        ));
    }

    if params.n_voice == 0 || params.n_voice > MAX_VOICES {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidVoiceCount,
            format!(
                "nVoice must be in [1, {}], got {}",
                MAX_VOICES, params.n_voice
            ),
            "nVoice",
        ));
    }

    if params.channels == 0 || params.channels > MAX_CHANNELS {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidChannelCount,
            format!(
                "channels must be in [1, {}], got {}",
                MAX_CHANNELS, params.channels
            ),
            "channels",
        ));
    }

    validate_profiles(params, &mut result);
    validate_scalars(params, &mut result);

    if params.nasal_coupling {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::NasalCouplingExperimental,
            "nasal coupling is experimental and may be numerically unstable",
            "nasalCoupling",
        ));
        if params.vocal_tract_diameter.len() < params.nose_diameter.len() + 2 {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::NasalCouplingInactive,
                "nose must be at least two nodes shorter than the vocal tract for the junction to engage",
                "noseDiameter",
            ));
        }
    }

    result
}

fn validate_profiles(params: &TractParams, result: &mut ValidationResult) {
    for (path, profile) in [
        ("vocalTractDiameter", &params.vocal_tract_diameter),
        ("noseDiameter", &params.nose_diameter),
    ] {
        match validate_geometry(path, profile) {
            Ok(()) => {
                if let Some(i) = profile.iter().position(|&d| d == 0.0) {
                    result.add_warning(ValidationWarning::with_path(
                        WarningCode::DegenerateClosure,
                        "zero diameter closes the tube; its reflection is pinned to 0.999",
                        format!("{}[{}]", path, i),
                    ));
                }
            }
            Err(e) => result.add_error(e),
        }
    }
}

fn validate_scalars(params: &TractParams, result: &mut ValidationResult) {
    let checks: [(&str, Result<(), CommonValidationError>); 22] = [
        ("fadeIn", validate_non_negative("fadeIn", params.fade_in)),
        ("fadeOut", validate_non_negative("fadeOut", params.fade_out)),
        (
            "expDecayTo",
            validate_non_negative("expDecayTo", params.exp_decay_to),
        ),
        ("frequency", validate_positive("frequency", params.frequency)),
        ("sigma2", validate_positive("sigma2", params.sigma2)),
        ("noiseMix", validate_unit_interval("noiseMix", params.noise_mix)),
        (
            "vibratoAmount",
            validate_range(
                "vibratoAmount",
                params.vibrato_amount,
                0.0,
                MAX_VIBRATO_CENTS,
            ),
        ),
        (
            "vibratoPeriod",
            validate_non_negative("vibratoPeriod", params.vibrato_period),
        ),
        (
            "tubeDiameterMultiplier",
            validate_positive("tubeDiameterMultiplier", params.tube_diameter_multiplier)
                .and_then(|()| {
                    validate_range(
                        "tubeDiameterMultiplier",
                        params.tube_diameter_multiplier,
                        0.0,
                        MAX_TUBE_DIAMETER_MULTIPLIER,
                    )
                }),
        ),
        ("tongue0X", validate_finite("tongue0X", params.tongue0_x)),
        ("tongue0Y", validate_finite("tongue0Y", params.tongue0_y)),
        ("tongue0W", validate_finite("tongue0W", params.tongue0_w)),
        ("tongue1X", validate_finite("tongue1X", params.tongue1_x)),
        ("tongue1Y", validate_finite("tongue1Y", params.tongue1_y)),
        ("tongue1W", validate_finite("tongue1W", params.tongue1_w)),
        (
            "glottalReflection",
            validate_range("glottalReflection", params.glottal_reflection, -1.0, 1.0),
        ),
        (
            "lipReflection",
            validate_range("lipReflection", params.lip_reflection, -1.0, 1.0),
        ),
        (
            "randomDetune",
            validate_non_negative("randomDetune", params.random_detune),
        ),
        (
            "randomPulseWidth",
            validate_non_negative("randomPulseWidth", params.random_pulse_width),
        ),
        (
            "randomTongue0X",
            validate_jitter(&[
                params.random_tongue0_x,
                params.random_tongue0_y,
                params.random_tongue0_w,
            ]),
        ),
        (
            "randomTongue1X",
            validate_jitter(&[
                params.random_tongue1_x,
                params.random_tongue1_y,
                params.random_tongue1_w,
            ]),
        ),
        (
            "stereoMerge",
            validate_unit_interval("stereoMerge", params.stereo_merge),
        ),
    ];

    for (path, check) in checks {
        if let Err(e) = check {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidParameter,
                e.to_string(),
                path,
            ));
        }
    }
}

fn validate_jitter(amounts: &[f64; 3]) -> Result<(), CommonValidationError> {
    for (name, &amount) in ["x", "y", "w"].iter().zip(amounts) {
        validate_non_negative(&format!("tongue jitter {}", name), amount)?;
    }
    Ok(())
}
