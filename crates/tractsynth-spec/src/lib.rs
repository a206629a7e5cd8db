//! Tractsynth Render Request Library
//!
//! This crate provides types, validation, and hashing for tractsynth render
//! requests. A request is a JSON document describing one vocal-tract ensemble
//! render: glottal source settings, the tract and nose diameter profiles, tongue
//! shaping, chorus detune, and the post-processing applied to the result.
//!
//! # Example
//!
//! ```
//! use tractsynth_spec::{validate_params, TractParams, Oversample};
//! use tractsynth_spec::hash::canonical_params_hash;
//!
//! let params = TractParams {
//!     render_duration: 0.5,
//!     over_sample: Oversample::X2,
//!     n_voice: 4,
//!     ..TractParams::default()
//! };
//!
//! // Validate the request
//! let result = validate_params(&params);
//! assert!(result.is_ok());
//!
//! // Compute the canonical hash
//! let hash = canonical_params_hash(&params).unwrap();
//! assert_eq!(hash.len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`params`]: Render request types and their defaults
//! - [`profile`]: Default vocal tract and nose diameter profiles
//! - [`validation`]: Request validation functions
//! - [`hash`]: Canonical hashing and seed derivation

pub mod error;
pub mod hash;
pub mod params;
pub mod profile;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::{canonical_params_hash, channel_seed, CHANNEL_SEED_STRIDE};
pub use params::{NormalizeMode, Oversample, TongueHump, TongueJitter, TractParams};
pub use profile::{default_nose_diameter, default_vocal_tract_diameter};
pub use validation::{validate_geometry, validate_params};
