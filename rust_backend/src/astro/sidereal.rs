//! Sidereal time.

use qtty::Degrees;

use crate::time::JulianDate;

/// Greenwich mean sidereal time (IAU 1982 expression, Meeus 12.4).
pub fn greenwich_mean_sidereal_time(jd: JulianDate) -> Degrees {
    let d = jd.value() - JulianDate::J2000.value();
    let t = d / 36_525.0;
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    Degrees::new(gmst).wrap_pos()
}

/// Local mean sidereal time for an observer at east longitude `lon`.
pub fn local_sidereal_time(jd: JulianDate, lon: Degrees) -> Degrees {
    (greenwich_mean_sidereal_time(jd) + lon).wrap_pos()
}
