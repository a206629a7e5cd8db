//! Common validation utilities for scalar parameters and diameter profiles.

use std::fmt;

/// Error type for common validation failures.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonValidationError {
    /// Human-readable error message.
    pub message: String,
    /// Offending element for sequence checks.
    pub index: Option<usize>,
}

impl CommonValidationError {
    /// Creates a new validation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index: None,
        }
    }

    /// Creates a new validation error pointing at one element of a sequence.
    pub fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for CommonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommonValidationError {}

/// Validate that a value is finite.
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_finite;
///
/// assert!(validate_finite("tongue0X", 1.25).is_ok());
/// assert!(validate_finite("tongue0X", f64::NAN).is_err());
/// ```
pub fn validate_finite(name: &str, value: f64) -> Result<(), CommonValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CommonValidationError::new(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

/// Validate that a value is in [0, 1] (the unit interval).
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_unit_interval;
///
/// assert!(validate_unit_interval("noiseMix", 0.5).is_ok());
/// assert!(validate_unit_interval("noiseMix", 1.5).is_err());
/// ```
pub fn validate_unit_interval(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_range(name, value, 0.0, 1.0)
}

/// Validate that a value is positive (> 0).
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_positive;
///
/// assert!(validate_positive("sigma2", 0.03).is_ok());
/// assert!(validate_positive("sigma2", 0.0).is_err());
/// assert!(validate_positive("sigma2", f64::NAN).is_err());
/// ```
pub fn validate_positive(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if value <= 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is non-negative (>= 0).
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_non_negative;
///
/// assert!(validate_non_negative("fadeIn", 0.0).is_ok());
/// assert!(validate_non_negative("fadeIn", -1.0).is_err());
/// ```
pub fn validate_non_negative(name: &str, value: f64) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if value < 0.0 {
        return Err(CommonValidationError::new(format!(
            "{} must be non-negative, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validate that a value is within a specified range [min, max].
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_range;
///
/// assert!(validate_range("lipReflection", -0.85, -1.0, 1.0).is_ok());
/// assert!(validate_range("lipReflection", -1.5, -1.0, 1.0).is_err());
/// ```
pub fn validate_range(
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), CommonValidationError> {
    validate_finite(name, value)?;
    if value < min || value > max {
        return Err(CommonValidationError::new(format!(
            "{} must be in [{}, {}], got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

/// Validate that a diameter profile can form a tube.
///
/// A tube needs at least two nodes (one section), and every diameter must be
/// finite and in `[0, max]`. Zero is allowed and closes the tube at that node.
///
/// # Example
/// ```
/// use tractsynth_spec::validation::common::validate_diameter_profile;
///
/// assert!(validate_diameter_profile("noseDiameter", &[1.0, 0.5, 0.0], 10.0).is_ok());
/// assert!(validate_diameter_profile("noseDiameter", &[1.0], 10.0).is_err());
/// assert!(validate_diameter_profile("noseDiameter", &[1.0, -0.5], 10.0).is_err());
/// assert!(validate_diameter_profile("noseDiameter", &[1.0, 1e154], 10.0).is_err());
/// ```
pub fn validate_diameter_profile(
    name: &str,
    diameter: &[f64],
    max: f64,
) -> Result<(), CommonValidationError> {
    if diameter.len() < 2 {
        return Err(CommonValidationError::new(format!(
            "{} needs at least 2 entries, got {}",
            name,
            diameter.len()
        )));
    }
    for (i, &d) in diameter.iter().enumerate() {
        if !d.is_finite() {
            return Err(CommonValidationError::at(
                i,
                format!("{}[{}] must be finite, got {}", name, i, d),
            ));
        }
        if d < 0.0 {
            return Err(CommonValidationError::at(
                i,
                format!("{}[{}] must be non-negative, got {}", name, i, d),
            ));
        }
        if d > max {
            return Err(CommonValidationError::at(
                i,
                format!("{}[{}] must be at most {}, got {}", name, i, max, d),
            ));
        }
    }
    Ok(())
}
