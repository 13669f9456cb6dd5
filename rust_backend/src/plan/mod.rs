//! Observing plans: per-night twilight and Moon data for one observatory.

use std::fs;
use std::path::Path;

use qtty::{Degrees, Kilometers};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::time::JulianDate;

/// An observing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observatory {
    pub name: String,
    /// East longitude
    pub lon: Degrees,
    pub lat: Degrees,
    pub elevation: Kilometers,
}

impl Observatory {
    /// Las Campanas Observatory.
    pub fn lco() -> Self {
        Self {
            name: "LCO".to_string(),
            lon: Degrees::new(-70.6926),
            lat: Degrees::new(-29.0146),
            elevation: Kilometers::new(2.38),
        }
    }

    /// Apache Point Observatory.
    pub fn apo() -> Self {
        Self {
            name: "APO".to_string(),
            lon: Degrees::new(-105.820_277_8),
            lat: Degrees::new(32.780_277_8),
            elevation: Kilometers::new(2.788),
        }
    }
}

/// Sun and Moon data for one night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightRecord {
    /// Integer Julian Date identifying the night
    pub jd: i64,
    pub evening_twilight: JulianDate,
    pub morning_twilight: JulianDate,
    /// Degrees
    pub moon_ra: f64,
    /// Degrees
    pub moon_dec: f64,
    /// Illuminated fraction of the Moon, 0-1
    pub moon_phase: f64,
}

impl NightRecord {
    /// Length of the dark time between twilights, in days.
    pub fn duration_days(&self) -> f64 {
        self.morning_twilight.value() - self.evening_twilight.value()
    }
}

/// Nights of a survey at one observatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservingPlan {
    pub observatory: Observatory,
    pub nights: Vec<NightRecord>,
}

impl ObservingPlan {
    pub fn new(observatory: Observatory, nights: Vec<NightRecord>) -> Self {
        Self { observatory, nights }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let plan: ObservingPlan = serde_path_to_error::deserialize(de)?;
        for night in &plan.nights {
            if night.morning_twilight <= night.evening_twilight {
                return Err(SchedulerError::InvalidPlan(format!(
                    "night {} ends before it starts",
                    night.jd
                )));
            }
        }
        Ok(plan)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path.as_ref())?)
    }

    /// The record of night `jd`.
    pub fn night(&self, jd: i64) -> Result<&NightRecord> {
        self.nights
            .iter()
            .find(|n| n.jd == jd)
            .ok_or(SchedulerError::NightNotInPlan(jd))
    }

    pub fn len(&self) -> usize {
        self.nights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nights.is_empty()
    }
}
