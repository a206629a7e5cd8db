//! Building blocks of the vocal tract voice model.
//!
//! - `noise` - Band-limited Gaussian noise for aspiration and frication
//! - `glottis` - Gaussian glottal pulse oscillator with breathiness blend
//! - `tube` - Kelly-Lochbaum waveguide tube
//! - `nasal` - Three-port junction coupling the tract to the nose
//! - `tongue` - Tongue hump function and per-voice tract shaping

pub mod glottis;
pub mod nasal;
pub mod noise;
pub mod tongue;
pub mod tube;

pub use glottis::GlottalOscillator;
pub use nasal::NasalJunction;
pub use noise::BandNoiseGenerator;
pub use tongue::{shape_tract, tongue_func, ShapedTract};
pub use tube::Tube;
