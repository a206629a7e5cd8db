//! Filters used by the voice model and the decimation pipeline.

pub mod multirate;
pub mod svf;

pub use multirate::{DecimationLowpass, HalfBandIir, OversamplePipeline};
pub use svf::{StateVariableFilter, SvfOutput};
