//! Error types for the audio backend.

use tractsynth_spec::{BackendError, ValidationError};
use thiserror::Error;

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

/// Errors that can occur during a render.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The request failed validation.
    #[error("invalid render request: {}", format_errors(.errors))]
    Validation {
        /// All validation errors, in the order they were found.
        errors: Vec<ValidationError>,
    },

    /// A diameter profile cannot form a tube.
    #[error("invalid geometry '{name}': {message}")]
    InvalidGeometry {
        /// Profile name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Internal synthesis error.
    #[error("synthesis error: {message}")]
    Synthesis {
        /// Error message.
        message: String,
    },
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AudioError {
    /// Creates an invalid geometry error.
    pub fn invalid_geometry(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a synthesis error.
    pub fn synthesis(message: impl Into<String>) -> Self {
        Self::Synthesis {
            message: message.into(),
        }
    }
}

impl From<Vec<ValidationError>> for AudioError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation { errors }
    }
}

impl BackendError for AudioError {
    fn code(&self) -> &'static str {
        match self {
            AudioError::Validation { .. } => "AUDIO_001",
            AudioError::InvalidGeometry { .. } => "AUDIO_002",
            AudioError::Synthesis { .. } => "AUDIO_003",
        }
    }

    fn category(&self) -> &'static str {
        "audio"
    }
}
