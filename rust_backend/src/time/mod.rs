//! Time scales used by the scheduler.
//!
//! Nights are keyed by integer Julian Date and instants within a night are
//! fractional Julian Dates (UT). See [`JulianDate`].

pub mod julian;

pub use julian::{JulianDate, SECONDS_PER_DAY};
