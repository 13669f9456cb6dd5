//! Per-night derived quantities.

use qtty::Degrees;

use crate::astro::{min_altitude_for_airmass, AltitudeCalculator};
use crate::catalog::TileCatalog;
use crate::error::Result;
use crate::geometry::{great_circle_distance, radec_to_vector, Vec3};
use crate::numeric;
use crate::plan::NightRecord;
use crate::time::JulianDate;

/// Everything the selector needs about one night that does not change
/// during the night.
///
/// The Moon is treated as fixed for the whole night, so the moon mask is
/// computed once here. Borrows the catalog it was prepared for.
#[derive(Debug, Clone)]
pub struct NightContext<'a> {
    catalog: &'a TileCatalog,
    night: NightRecord,
    moon_distance: Vec<f64>,
    moon_ok: Vec<bool>,
    min_altitude: Vec<f64>,
    max_priority: f64,
    pub(crate) altitude: AltitudeCalculator,
    pub(crate) pointings: Vec<Vec3>,
}

impl<'a> NightContext<'a> {
    pub(crate) fn new(catalog: &'a TileCatalog, night: NightRecord, lat: Degrees) -> Result<Self> {
        catalog.validate()?;

        let moon_distance: Vec<f64> = catalog
            .ra
            .iter()
            .zip(&catalog.dec)
            .map(|(&ra, &dec)| great_circle_distance(night.moon_ra, night.moon_dec, ra, dec))
            .collect();

        let moon_ok = moon_distance
            .iter()
            .zip(&catalog.moon_distance_limit)
            .zip(&catalog.lunation_limit)
            .map(|((&dist, &dist_limit), &lunation_limit)| {
                dist > dist_limit && night.moon_phase <= lunation_limit
            })
            .collect();

        let min_altitude: Vec<f64> = catalog
            .airmass_limit
            .iter()
            .map(|&airmass| min_altitude_for_airmass(airmass))
            .collect();
        numeric::checked_column(&min_altitude, "minimum altitude from airmass limit")?;

        let pointings = catalog
            .ra
            .iter()
            .zip(&catalog.dec)
            .map(|(&ra, &dec)| radec_to_vector(ra, dec))
            .collect();

        Ok(Self {
            catalog,
            night,
            moon_distance,
            moon_ok,
            min_altitude,
            max_priority: catalog.max_target_priority().unwrap_or(0.0),
            altitude: AltitudeCalculator::new(&catalog.ra, &catalog.dec, lat)?,
            pointings,
        })
    }

    pub fn catalog(&self) -> &'a TileCatalog {
        self.catalog
    }

    pub fn night(&self) -> &NightRecord {
        &self.night
    }

    pub fn evening_twilight(&self) -> JulianDate {
        self.night.evening_twilight
    }

    pub fn morning_twilight(&self) -> JulianDate {
        self.night.morning_twilight
    }

    /// Moon illumination fraction for the night.
    pub fn lunation(&self) -> f64 {
        self.night.moon_phase
    }

    /// Moon to tile separation, degrees.
    pub fn moon_distance(&self) -> &[f64] {
        &self.moon_distance
    }

    /// Tiles whose moon distance and lunation limits are met tonight.
    pub fn moon_ok(&self) -> &[bool] {
        &self.moon_ok
    }

    /// Lowest altitude allowed by each tile's airmass limit, degrees.
    pub fn min_altitude(&self) -> &[f64] {
        &self.min_altitude
    }

    /// Highest target priority in the catalog.
    pub fn max_priority(&self) -> f64 {
        self.max_priority
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
