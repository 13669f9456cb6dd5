//! Shared builders for integration tests.
#![allow(dead_code)]

use qtty::{Degrees, Kilometers, Seconds};

use lvm_scheduler::astro::{local_sidereal_time, ShadowHeightModel, SunSample, TabulatedEphemeris};
use lvm_scheduler::geometry::{Frame, Vec3};
use lvm_scheduler::models::{Region, Target, Tile};
use lvm_scheduler::{JulianDate, NightRecord, Observatory, ObservingPlan};

pub const NIGHT: i64 = 2_459_458;
pub const EVENING: f64 = 2_459_458.6;
pub const MORNING: f64 = 2_459_458.9;

/// Circular ICRS target with loose constraints and one 900 s exposure.
pub fn circle(name: &str, priority: f64, ra: f64, dec: f64, radius: f64) -> Target {
    Target {
        name: name.to_string(),
        priority,
        telescope: "LVM-160".to_string(),
        frame: Frame::Icrs,
        region: Region::Circle {
            lon: ra,
            lat: dec,
            radius,
        },
        max_airmass: 2.0,
        max_lunation: 1.0,
        min_shadowheight: Kilometers::new(0.0),
        min_moon_dist: Degrees::new(0.0),
        exptime: Seconds::new(900.0),
        n_exposures: 1,
        min_exposures: 1,
        overlap: true,
    }
}

/// Square `n` x `n` grid of tiles, `step` degrees apart, centred on (`ra`, `dec`).
pub fn grid(ra: f64, dec: f64, n: i32, step: f64) -> Vec<Tile> {
    let half = n / 2;
    let mut tiles = Vec::new();
    for i in -half..=half {
        for j in -half..=half {
            tiles.push(Tile::new(ra + f64::from(i) * step, dec + f64::from(j) * step));
        }
    }
    tiles
}

/// Shadow model returning the same height everywhere.
pub struct ConstantShadow(pub f64);

impl ShadowHeightModel for ConstantShadow {
    fn shadow_heights(&self, _jd: JulianDate, _pointings: &[Vec3], mask: &[bool]) -> lvm_scheduler::Result<Vec<f64>> {
        Ok(mask.iter().map(|&m| if m { self.0 } else { 0.0 }).collect())
    }
}

/// Observatory on the equator at Greenwich, so altitude is `90 - |ha|` for dec 0.
pub fn equator_observatory() -> Observatory {
    Observatory {
        name: "EQUATOR".to_string(),
        lon: Degrees::new(0.0),
        lat: Degrees::new(0.0),
        elevation: Kilometers::new(0.0),
    }
}

/// Local sidereal time at Greenwich, degrees.
pub fn lst_deg(jd: f64) -> f64 {
    local_sidereal_time(JulianDate::new(jd), Degrees::new(0.0)).value()
}

/// One-night plan with the Moon opposite the meridian at `reference_jd`.
pub fn plan(observatory: Observatory, reference_jd: f64, moon_phase: f64) -> ObservingPlan {
    ObservingPlan::new(
        observatory,
        vec![NightRecord {
            jd: NIGHT,
            evening_twilight: JulianDate::new(EVENING),
            morning_twilight: JulianDate::new(MORNING),
            moon_ra: (lst_deg(reference_jd) + 180.0).rem_euclid(360.0),
            moon_dec: 0.0,
            moon_phase,
        }],
    )
}

/// Sun table over the night, always opposite the Greenwich meridian so the
/// equator observatory stays deep in the Earth's shadow.
pub fn midnight_sun(step_days: f64) -> TabulatedEphemeris {
    let mut samples = Vec::new();
    let mut jd = EVENING - 0.05;
    while jd <= MORNING + 0.05 {
        samples.push(SunSample {
            jd,
            ra: (lst_deg(jd) + 180.0).rem_euclid(360.0),
            dec: 0.0,
            distance_au: 1.0,
        });
        jd += step_days;
    }
    TabulatedEphemeris::new(samples).expect("valid sun table")
}
