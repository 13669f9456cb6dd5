use std::fmt;

use chrono::{DateTime, Utc};
use qtty::Seconds;
use serde::{Deserialize, Serialize};

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Offset between Julian Date and Modified Julian Date.
const MJD_OFFSET: f64 = 2_400_000.5;

/// A Julian Date in UT.
///
/// Thin wrapper around `f64`, serialized as the bare number.
///
/// # Examples
///
/// ```
/// use lvm_scheduler::time::JulianDate;
/// use qtty::Seconds;
///
/// let jd = JulianDate::new(2459458.5);
/// let later = jd.add_seconds(Seconds::new(43_200.0));
/// assert_eq!(later.value(), 2459459.0);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDate(f64);

impl JulianDate {
    /// J2000.0 epoch (2000-01-01T12:00:00 TT, used here as UT).
    pub const J2000: JulianDate = JulianDate(2_451_545.0);

    pub const fn new(jd: f64) -> Self {
        Self(jd)
    }

    /// Raw Julian Date.
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Modified Julian Date.
    pub fn to_mjd(&self) -> f64 {
        self.0 - MJD_OFFSET
    }

    /// Builds a Julian Date from a UTC timestamp.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
        Self(UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY)
    }

    /// Converts back to UTC. Returns `None` outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        let seconds = (self.0 - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
        if !seconds.is_finite() {
            return None;
        }
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
    }

    /// Returns this instant shifted by `dt`.
    pub fn add_seconds(&self, dt: Seconds) -> Self {
        Self(self.0 + dt.value() / SECONDS_PER_DAY)
    }

    /// Elapsed time from `self` to `later` (negative if `later` is earlier).
    pub fn seconds_until(&self, later: JulianDate) -> Seconds {
        Seconds::new((later.0 - self.0) * SECONDS_PER_DAY)
    }

    /// Integer night key: the Julian Day number whose noon precedes this instant.
    pub fn night_key(&self) -> i64 {
        self.0.floor() as i64
    }
}

impl From<f64> for JulianDate {
    fn from(v: f64) -> Self {
        JulianDate::new(v)
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JD {:.6}", self.0)
    }
}
