//! Tractsynth Audio Backend
//!
//! This crate renders tractsynth requests with a digital waveguide model of the
//! human vocal tract.
//!
//! # Overview
//!
//! Every channel is an ensemble of voices. A voice is a Gaussian glottal pulse
//! oscillator with vibrato and aspiration noise, feeding a Kelly-Lochbaum tube
//! whose diameter profile is shaped by two jittered tongue humps. Frication
//! noise is injected at the constriction, and an optional nose branch can be
//! coupled to the tract through a three-port junction.
//!
//! The ensemble runs at 1x, 2x or 16x the output rate and is brought back down
//! by IIR decimation filters. Finished channels are faded in and out,
//! optionally merged towards each other, and peak normalized.
//!
//! # Determinism
//!
//! All synthesis is deterministic. Given the same request the output is
//! bit-identical across runs (on the same platform). Each channel draws every
//! random value from one PCG32 stream seeded from `seed` and the channel
//! index, in a fixed order.
//!
//! # Example
//!
//! ```
//! use tractsynth_backend_audio::render;
//! use tractsynth_spec::{Oversample, TractParams};
//!
//! let params = TractParams {
//!     render_duration: 0.01,
//!     over_sample: Oversample::X2,
//!     n_voice: 2,
//!     channels: 2,
//!     ..TractParams::default()
//! };
//! let output = render(&params).unwrap();
//!
//! assert_eq!(output.channels.len(), 2);
//! assert_eq!(output.pcm_hash.len(), 64);
//! ```
//!
//! # Crate Structure
//!
//! - [`render()`] - Main entry point, renders and finalizes every channel
//! - [`filter`] - State variable filter and oversampling decimators
//! - [`mixer`] - Fades, stereo merge and normalization
//! - [`modulation`] - Random line vibrato source
//! - [`rng`] - Deterministic RNG and distribution helpers
//! - [`synthesis`] - Glottis, tube, nasal junction and tongue shaping
//! - [`voice`] - One voice of the ensemble

pub mod error;
pub mod filter;
pub mod generate;
pub mod mixer;
pub mod modulation;
pub mod rng;
pub mod synthesis;
pub mod voice;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use generate::{
    render, render_channel, render_voices, ChannelRender, RenderOutput, RenderStats,
};
pub use voice::Voice;
