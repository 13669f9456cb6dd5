//! Greedy tile selection.
//!
//! A [`Scheduler`] is bound to one observatory. For each night it prepares a
//! [`NightContext`] once, then answers "what next?" any number of times with
//! [`Scheduler::select_next`]. The caller owns the record of exposure time
//! already obtained per tile and passes it in on every call, so a failed
//! exposure is retried by simply not crediting it.
//!
//! Selection is deterministic: the same context, time and observed record
//! always give the same tile.

pub mod night;
pub mod selection;
pub mod simulate;

pub use night::NightContext;
pub use selection::Selection;
pub use simulate::{simulate_night, ObservationRecord};

use log::{debug, info};
use qtty::{Degrees, HourAngles, Kilometers};

use crate::astro::{local_sidereal_time, ShadowHeightModel};
use crate::catalog::TileCatalog;
use crate::config::SchedulerSettings;
use crate::error::{Result, SchedulerError};
use crate::numeric;
use crate::plan::{Observatory, ObservingPlan};
use crate::time::JulianDate;

/// Selects the next tile to observe at one observatory.
#[derive(Debug, Clone)]
pub struct Scheduler<S> {
    observatory: Observatory,
    zenith_avoidance: Degrees,
    shadow: S,
}

impl<S: ShadowHeightModel> Scheduler<S> {
    pub fn new(observatory: Observatory, zenith_avoidance: Degrees, shadow: S) -> Self {
        Self {
            observatory,
            zenith_avoidance,
            shadow,
        }
    }

    pub fn from_settings(observatory: Observatory, settings: &SchedulerSettings, shadow: S) -> Self {
        Self::new(observatory, Degrees::new(settings.zenith_avoidance_deg), shadow)
    }

    pub fn observatory(&self) -> &Observatory {
        &self.observatory
    }

    pub fn zenith_avoidance(&self) -> Degrees {
        self.zenith_avoidance
    }

    /// Derive the per-night quantities for night `jd` of `plan`.
    ///
    /// Fails if the plan belongs to another observatory, the night is not in
    /// the plan, the catalog columns disagree in length, or an airmass limit
    /// has no altitude equivalent.
    pub fn prepare_for_night<'a>(
        &self,
        jd: i64,
        plan: &ObservingPlan,
        catalog: &'a TileCatalog,
    ) -> Result<NightContext<'a>> {
        if plan.observatory.name != self.observatory.name {
            return Err(SchedulerError::ObservatoryMismatch {
                plan: plan.observatory.name.clone(),
                scheduler: self.observatory.name.clone(),
            });
        }
        let night = *plan.night(jd)?;
        let context = NightContext::new(catalog, night, self.observatory.lat)?;

        info!(
            "Prepared night {} at {}: {} tiles, {} pass the moon constraints (lunation {:.2})",
            jd,
            self.observatory.name,
            context.len(),
            context.moon_ok().iter().filter(|&&ok| ok).count(),
            context.lunation()
        );
        Ok(context)
    }

    /// Choose the tile to observe at `jd`.
    ///
    /// `observed` holds the exposure time (s) already obtained for each
    /// catalog row. A tile is a candidate when, for the whole visit, it stays
    /// above its airmass limit and below the zenith avoidance limit, the Moon
    /// constraints hold, it still needs exposure time, and its shadow height
    /// is above its limit. Tiles already started outrank every fresh tile.
    pub fn select_next(&self, context: &NightContext<'_>, jd: JulianDate, observed: &[f64]) -> Result<Selection> {
        if jd < context.evening_twilight() {
            return Err(SchedulerError::NightNotStarted {
                jd: jd.value(),
                evening: context.evening_twilight().value(),
            });
        }
        if jd >= context.morning_twilight() {
            return Err(SchedulerError::TwilightReached {
                jd: jd.value(),
                morning: context.morning_twilight().value(),
            });
        }

        let catalog = context.catalog();
        if observed.len() != catalog.len() {
            return Err(SchedulerError::length_mismatch(
                "observed exposure record",
                catalog.len(),
                observed.len(),
            ));
        }

        let lst_deg = local_sidereal_time(jd, self.observatory.lon);
        let lst: HourAngles = lst_deg.to();

        let alt_start = context.altitude.altitudes(lst_deg);
        let alt_end = context.altitude.altitudes_after(lst_deg, &catalog.visit_exptime)?;
        let zenith_limit = 90.0 - self.zenith_avoidance.value();
        let min_altitude = context.min_altitude();
        let moon_ok = context.moon_ok();

        let mut valid: Vec<bool> = (0..catalog.len())
            .map(|i| {
                let below_zenith = alt_start[i] < zenith_limit && alt_end[i] < zenith_limit;
                let above_airmass = alt_start[i] > min_altitude[i] && alt_end[i] > min_altitude[i];
                let incomplete = observed[i] < catalog.total_exptime[i];
                below_zenith && above_airmass && moon_ok[i] && incomplete
            })
            .collect();

        let heights = self.shadow.shadow_heights(jd, &context.pointings, &valid)?;
        if heights.len() != catalog.len() {
            return Err(SchedulerError::length_mismatch(
                "shadow heights",
                catalog.len(),
                heights.len(),
            ));
        }
        numeric::checked_column(&heights, "shadow height")?;
        for (ok, (&h, &limit)) in valid.iter_mut().zip(heights.iter().zip(&catalog.hz_limit)) {
            *ok = *ok && h > limit;
        }

        let candidates: Vec<usize> = (0..catalog.len()).filter(|&i| valid[i]).collect();
        if candidates.is_empty() {
            debug!("{}: no observable tile", jd);
            return Ok(Selection::none(lst, context.lunation()));
        }

        // Started but unfinished tiles are promoted above every target.
        let override_priority = context.max_priority() + 1.0;
        let priority: Vec<f64> = (0..catalog.len())
            .map(|i| {
                if observed[i] > 0.0 && observed[i] < catalog.total_exptime[i] {
                    override_priority
                } else {
                    catalog.target_priority[i]
                }
            })
            .collect();

        let index = selection::cascade(&candidates, &priority, &catalog.tile_priority, &alt_start)
            .ok_or_else(|| {
                SchedulerError::InvariantViolation(format!(
                    "selection cascade chose nothing from {} valid tiles at {}",
                    candidates.len(),
                    jd
                ))
            })?;

        debug!(
            "{}: selected tile {} ({}) out of {} candidates",
            jd,
            catalog.tile_id[index],
            catalog.target[index],
            candidates.len()
        );

        Ok(Selection {
            index: Some(index),
            tile_id: Some(catalog.tile_id[index]),
            lst,
            shadow_height: Kilometers::new(heights[index]),
            altitude: Degrees::new(alt_start[index]),
            lunation: context.lunation(),
        })
    }
}
