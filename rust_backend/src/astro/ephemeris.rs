//! Sun position providers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::geometry::vector::{radec_to_vector, Vec3};
use crate::time::JulianDate;

/// Kilometres per astronomical unit.
pub const AU_KM: f64 = 149_597_870.7;

/// Source of the Sun's geocentric position.
pub trait SunEphemeris {
    /// Geocentric equatorial position of the Sun at `jd`, in km.
    fn sun_position(&self, jd: JulianDate) -> Result<Vec3>;
}

/// One row of a tabulated ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunSample {
    pub jd: f64,
    /// Degrees
    pub ra: f64,
    /// Degrees
    pub dec: f64,
    #[serde(default = "default_distance")]
    pub distance_au: f64,
}

fn default_distance() -> f64 {
    1.0
}

/// Sun positions sampled on a time grid, linearly interpolated in between.
///
/// Directions are interpolated as vectors and renormalized, so samples may
/// straddle RA = 0 freely. Times outside the table are an error.
#[derive(Debug, Clone)]
pub struct TabulatedEphemeris {
    samples: Vec<SunSample>,
}

impl TabulatedEphemeris {
    /// Requires at least two samples in strictly increasing time order.
    pub fn new(samples: Vec<SunSample>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(SchedulerError::Ephemeris(format!(
                "need at least 2 samples, got {}",
                samples.len()
            )));
        }
        if let Some(pair) = samples.windows(2).find(|w| w[1].jd <= w[0].jd) {
            return Err(SchedulerError::Ephemeris(format!(
                "samples not in increasing time order at JD {}",
                pair[1].jd
            )));
        }
        Ok(Self { samples })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let samples: Vec<SunSample> = serde_path_to_error::deserialize(de)?;
        Self::new(samples)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path.as_ref())?)
    }

    /// Covered time range.
    pub fn span(&self) -> (JulianDate, JulianDate) {
        let first = self.samples[0].jd;
        let last = self.samples[self.samples.len() - 1].jd;
        (JulianDate::new(first), JulianDate::new(last))
    }
}

impl SunEphemeris for TabulatedEphemeris {
    fn sun_position(&self, jd: JulianDate) -> Result<Vec3> {
        let t = jd.value();
        let (first, last) = self.span();
        if t < first.value() || t > last.value() {
            return Err(SchedulerError::Ephemeris(format!(
                "JD {} outside table range {}..{}",
                t,
                first.value(),
                last.value()
            )));
        }

        // First sample strictly after t; clamped so the last sample pairs with its predecessor.
        let upper = self
            .samples
            .partition_point(|s| s.jd <= t)
            .clamp(1, self.samples.len() - 1);
        let (a, b) = (&self.samples[upper - 1], &self.samples[upper]);
        let f = (t - a.jd) / (b.jd - a.jd);

        let va = radec_to_vector(a.ra, a.dec);
        let vb = radec_to_vector(b.ra, b.dec);
        let direction = (va * (1.0 - f) + vb * f).try_normalize(1e-15).ok_or_else(|| {
            SchedulerError::Ephemeris(format!("antipodal samples around JD {}", t))
        })?;
        let distance = (a.distance_au + f * (b.distance_au - a.distance_au)) * AU_KM;

        Ok(direction * distance)
    }
}
