//! Fast altitude evaluation for a fixed set of pointings.

use qtty::Degrees;

use crate::error::{Result, SchedulerError};

/// Sidereal degrees per second of UT.
pub const SIDEREAL_DEG_PER_SECOND: f64 = 360.985_647_366_29 / 86_400.0;

/// Altitude of many pointings for one observer.
///
/// The declination terms of `sin(alt) = sin(dec) sin(lat) + cos(dec) cos(lat) cos(H)`
/// are evaluated once, so each call only costs one cosine per pointing.
#[derive(Debug, Clone)]
pub struct AltitudeCalculator {
    ra: Vec<f64>,
    sin_term: Vec<f64>,
    cos_term: Vec<f64>,
}

impl AltitudeCalculator {
    /// `ra`/`dec` in degrees, `lat` of the observer.
    pub fn new(ra: &[f64], dec: &[f64], lat: Degrees) -> Result<Self> {
        if ra.len() != dec.len() {
            return Err(SchedulerError::length_mismatch("declinations", ra.len(), dec.len()));
        }
        let (sin_lat, cos_lat) = lat.value().to_radians().sin_cos();
        let (sin_term, cos_term) = dec
            .iter()
            .map(|d| {
                let (s, c) = d.to_radians().sin_cos();
                (s * sin_lat, c * cos_lat)
            })
            .unzip();
        Ok(Self {
            ra: ra.to_vec(),
            sin_term,
            cos_term,
        })
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }

    /// Altitudes in degrees at local sidereal time `lst`.
    pub fn altitudes(&self, lst: Degrees) -> Vec<f64> {
        (0..self.len()).map(|i| self.altitude_at(i, lst.value())).collect()
    }

    /// Altitudes in degrees after each pointing's own `elapsed` seconds past `lst`.
    pub fn altitudes_after(&self, lst: Degrees, elapsed: &[f64]) -> Result<Vec<f64>> {
        if elapsed.len() != self.len() {
            return Err(SchedulerError::length_mismatch(
                "elapsed times",
                self.len(),
                elapsed.len(),
            ));
        }
        Ok(elapsed
            .iter()
            .enumerate()
            .map(|(i, &dt)| self.altitude_at(i, lst.value() + dt * SIDEREAL_DEG_PER_SECOND))
            .collect())
    }

    fn altitude_at(&self, i: usize, lst_deg: f64) -> f64 {
        let hour_angle = (lst_deg - self.ra[i]).to_radians();
        let sin_alt = self.sin_term[i] + self.cos_term[i] * hour_angle.cos();
        sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// Minimum altitude, in degrees, allowed by an airmass limit.
///
/// Plane-parallel atmosphere: `alt = 90 - acos(1 / airmass)`. Limits below 1
/// have no solution and give `NaN`.
pub fn min_altitude_for_airmass(airmass: f64) -> f64 {
    90.0 - (1.0 / airmass).acos().to_degrees()
}
