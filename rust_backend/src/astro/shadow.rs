//! Height of the Earth's shadow along a line of sight.
//!
//! Scattered sunlight from the upper atmosphere contaminates faint-sky
//! spectra. The shadow height of a pointing is the altitude above the Earth's
//! surface at which the line of sight leaves the Earth's umbra; the higher
//! it is, the less sunlit air is in the beam.
//!
//! The umbra is modelled as a cone with its apex behind the Earth on the
//! anti-solar axis, tangent to a spherical Earth and a spherical Sun.

use qtty::{Degrees, Kilometers};

use crate::error::{Result, SchedulerError};
use crate::geometry::vector::Vec3;
use crate::time::JulianDate;

use super::ephemeris::{SunEphemeris, AU_KM};
use super::sidereal::local_sidereal_time;

/// Earth radius used for the shadow cone, km.
pub const EARTH_RADIUS_KM: f64 = 6_357.0;
/// Sun radius, km.
pub const SUN_RADIUS_KM: f64 = 695_700.0;

/// Computes shadow heights for a set of pointings at one instant.
pub trait ShadowHeightModel {
    /// Shadow height in km for each pointing (unit vectors, ICRS).
    ///
    /// Only entries where `mask` is true are computed; the others are 0.
    fn shadow_heights(&self, jd: JulianDate, pointings: &[Vec3], mask: &[bool]) -> Result<Vec<f64>>;
}

/// Umbra cone geometry.
#[derive(Debug, Clone, Copy)]
struct Cone {
    /// Apex, geocentric km
    apex: Vec3,
    /// Unit axis from the apex towards the Sun
    axis: Vec3,
    cos2_theta: f64,
}

impl Cone {
    /// Cone for a Sun in direction `sun_dir` at the mean Sun distance.
    fn new(sun_dir: Vec3) -> Self {
        let d_ec = EARTH_RADIUS_KM * AU_KM / (SUN_RADIUS_KM - EARTH_RADIUS_KM);
        let theta = (EARTH_RADIUS_KM / d_ec).atan();
        Self {
            apex: sun_dir * -d_ec,
            axis: sun_dir,
            cos2_theta: theta.cos().powi(2),
        }
    }

    /// Is the geocentric point `p` in the umbra: inside the cone and on the
    /// night side of the Earth?
    fn in_umbra(&self, p: &Vec3) -> bool {
        let cp = p - self.apex;
        let along = cp.dot(&self.axis);
        p.dot(&self.axis) < 0.0 && along > 0.0 && along * along > cp.norm_squared() * self.cos2_theta
    }

    /// Distance along the ray `origin + t * dir` to where it leaves the cone.
    ///
    /// Solves `((P - apex) . axis)^2 = |P - apex|^2 cos^2(theta)` and keeps
    /// the smallest positive root on the Earth-side nappe.
    fn exit_distance(&self, origin: &Vec3, dir: &Vec3) -> Option<f64> {
        let co = origin - self.apex;
        let ua = dir.dot(&self.axis);
        let ca = co.dot(&self.axis);

        let a = ua * ua - self.cos2_theta;
        let b = 2.0 * (ua * ca - dir.dot(&co) * self.cos2_theta);
        let c = ca * ca - co.norm_squared() * self.cos2_theta;

        let mut roots = Vec::with_capacity(2);
        if a.abs() < 1e-15 {
            if b.abs() > 0.0 {
                roots.push(-c / b);
            }
        } else {
            let delta = b * b - 4.0 * a * c;
            if delta < 0.0 {
                return None;
            }
            let sq = delta.sqrt();
            roots.push((-b - sq) / (2.0 * a));
            roots.push((-b + sq) / (2.0 * a));
        }

        roots
            .into_iter()
            .filter(|&t| t > 0.0 && ca + t * ua > 0.0)
            .reduce(f64::min)
    }
}

/// Shadow height calculator for one observatory.
///
/// The observatory sits on a spherical Earth of radius
/// [`EARTH_RADIUS_KM`] plus its elevation, rotated by local sidereal time.
/// An observer outside the umbra (Sun up) gets height 0 for every pointing;
/// a line of sight that never leaves the umbra gets infinity.
#[derive(Debug, Clone)]
pub struct ShadowCalculator<E> {
    ephemeris: E,
    lon: Degrees,
    lat: Degrees,
    elevation: Kilometers,
}

impl<E: SunEphemeris> ShadowCalculator<E> {
    pub fn new(ephemeris: E, lon: Degrees, lat: Degrees, elevation: Kilometers) -> Self {
        Self {
            ephemeris,
            lon,
            lat,
            elevation,
        }
    }

    /// Geocentric equatorial position of the observatory at `jd`, km.
    pub fn observatory_position(&self, jd: JulianDate) -> Vec3 {
        let lst = local_sidereal_time(jd, self.lon).value().to_radians();
        let lat = self.lat.value().to_radians();
        let r = EARTH_RADIUS_KM + self.elevation.value();
        Vec3::new(r * lat.cos() * lst.cos(), r * lat.cos() * lst.sin(), r * lat.sin())
    }

    /// Shadow height of a single pointing, km.
    pub fn shadow_height(&self, jd: JulianDate, pointing: Vec3) -> Result<f64> {
        let heights = self.shadow_heights(jd, &[pointing], &[true])?;
        Ok(heights[0])
    }
}

impl<E: SunEphemeris> ShadowHeightModel for ShadowCalculator<E> {
    fn shadow_heights(&self, jd: JulianDate, pointings: &[Vec3], mask: &[bool]) -> Result<Vec<f64>> {
        if pointings.len() != mask.len() {
            return Err(SchedulerError::length_mismatch(
                "shadow height mask",
                pointings.len(),
                mask.len(),
            ));
        }

        let mut heights = vec![0.0; pointings.len()];
        if !mask.iter().any(|&m| m) {
            return Ok(heights);
        }

        let sun = self.ephemeris.sun_position(jd)?;
        let sun_dir = sun
            .try_normalize(1e-15)
            .ok_or_else(|| SchedulerError::Ephemeris(format!("zero Sun vector at {}", jd)))?;
        let cone = Cone::new(sun_dir);
        let observer = self.observatory_position(jd);
        if !cone.in_umbra(&observer) {
            return Ok(heights);
        }

        for (i, pointing) in pointings.iter().enumerate() {
            if !mask[i] {
                continue;
            }
            heights[i] = match cone.exit_distance(&observer, pointing) {
                Some(t) => (observer + pointing * t).norm() - EARTH_RADIUS_KM,
                None => f64::INFINITY,
            };
        }
        Ok(heights)
    }
}
