//! Celestial reference frames.
//!
//! Region boundaries may be given in Galactic coordinates; everything is
//! rotated into ICRS before any polygon is built, so comparisons between
//! targets never mix frames.

use nalgebra::Matrix3;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::vector::{radec_to_vector, vector_to_radec};

/// Rotation from ICRS to Galactic (J2000 definition of the Galactic pole and centre).
static ICRS_TO_GALACTIC: Lazy<Matrix3<f64>> = Lazy::new(|| {
    Matrix3::new(
        -0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2,
        0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9,
        -0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9,
    )
});

/// Reference frame of a target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    #[default]
    Icrs,
    Galactic,
}

impl Frame {
    /// Converts a position in this frame to ICRS `(ra, dec)` in degrees.
    pub fn to_icrs(self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        match self {
            Frame::Icrs => (lon_deg.rem_euclid(360.0), lat_deg),
            Frame::Galactic => {
                // Orthogonal rotation: the inverse is the transpose.
                vector_to_radec(&(ICRS_TO_GALACTIC.transpose() * radec_to_vector(lon_deg, lat_deg)))
            }
        }
    }

    /// Converts an ICRS position `(ra, dec)` in degrees to this frame.
    pub fn from_icrs(self, ra_deg: f64, dec_deg: f64) -> (f64, f64) {
        match self {
            Frame::Icrs => (ra_deg.rem_euclid(360.0), dec_deg),
            Frame::Galactic => vector_to_radec(&(*ICRS_TO_GALACTIC * radec_to_vector(ra_deg, dec_deg))),
        }
    }
}
