//! Post-processing of rendered channels.
//!
//! Channels come out of the voice model unnormalized. Before they are handed
//! back, the start and end are faded with a quarter cosine, stereo channels
//! are optionally pulled towards each other, and the peak is normalized.

mod processing;

#[cfg(test)]
mod tests_declick;
#[cfg(test)]
mod tests_normalization;
#[cfg(test)]
mod tests_stereo_merge;

pub use processing::{
    declick_in, declick_out, normalize, normalize_link, normalize_per_channel, peak, rms,
    stereo_merge,
};
