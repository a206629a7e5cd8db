//! Slow random modulation sources.
//!
//! The voice model uses a [`RandomLine`] for vibrato: a piecewise-linear walk
//! between Gaussian targets whose segment lengths follow an exponential
//! renewal process.

pub mod random_line;

#[cfg(test)]
mod tests;

pub use random_line::RandomLine;
