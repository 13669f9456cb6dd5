//! Positional astronomy needed by the selector.
//!
//! - [`sidereal`]: Greenwich and local mean sidereal time
//! - [`altitude`]: vectorized altitude evaluation and airmass limits
//! - [`ephemeris`]: Sun position providers
//! - [`shadow`]: Earth shadow height along lines of sight

pub mod altitude;
pub mod ephemeris;
pub mod shadow;
pub mod sidereal;

pub use altitude::{min_altitude_for_airmass, AltitudeCalculator};
pub use ephemeris::{SunEphemeris, SunSample, TabulatedEphemeris};
pub use shadow::{ShadowCalculator, ShadowHeightModel};
pub use sidereal::{greenwich_mean_sidereal_time, local_sidereal_time};
