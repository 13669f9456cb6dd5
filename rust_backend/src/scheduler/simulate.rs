//! Simulated execution of a night.

use log::info;
use qtty::{Degrees, HourAngles, Kilometers, Seconds};
use serde::{Deserialize, Serialize};

use super::{NightContext, Scheduler};
use crate::astro::ShadowHeightModel;
use crate::config::SimulationSettings;
use crate::error::{Result, SchedulerError};
use crate::models::TileId;
use crate::time::JulianDate;

/// One simulated visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Start of the visit
    pub jd: JulianDate,
    pub tile_id: TileId,
    pub index: usize,
    pub target: String,
    pub lst: HourAngles,
    pub altitude: Degrees,
    pub shadow_height: Kilometers,
    pub lunation: f64,
    pub exptime: Seconds,
}

/// Observe from evening to morning twilight, always taking the selected tile.
///
/// Every visit is assumed to succeed: its exposure time is credited to
/// `observed` and the clock advances by the visit plus the configured
/// overhead. When nothing is observable the clock advances by the idle step,
/// which must therefore be positive.
pub fn simulate_night<S: ShadowHeightModel>(
    scheduler: &Scheduler<S>,
    context: &NightContext<'_>,
    observed: &mut [f64],
    settings: &SimulationSettings,
) -> Result<Vec<ObservationRecord>> {
    if !(settings.idle_step_s > 0.0) || !(settings.overhead_s >= 0.0) {
        return Err(SchedulerError::Configuration(format!(
            "simulation needs a positive idle step and a non-negative overhead, got {} s and {} s",
            settings.idle_step_s, settings.overhead_s
        )));
    }

    let catalog = context.catalog();
    let idle = Seconds::new(settings.idle_step_s);
    let overhead = Seconds::new(settings.overhead_s);

    let mut records = Vec::new();
    let mut idle_steps = 0usize;
    let mut jd = context.evening_twilight();

    while jd < context.morning_twilight() {
        let selection = scheduler.select_next(context, jd, observed)?;
        let Some(index) = selection.index else {
            idle_steps += 1;
            jd = jd.add_seconds(idle);
            continue;
        };

        let exptime = Seconds::new(catalog.visit_exptime[index]);
        if exptime.value() <= 0.0 {
            return Err(SchedulerError::InvariantViolation(format!(
                "tile {} has a non-positive visit exposure time",
                catalog.tile_id[index]
            )));
        }
        observed[index] += exptime.value();

        records.push(ObservationRecord {
            jd,
            tile_id: catalog.tile_id[index],
            index,
            target: catalog.target[index].clone(),
            lst: selection.lst,
            altitude: selection.altitude,
            shadow_height: selection.shadow_height,
            lunation: selection.lunation,
            exptime,
        });
        jd = jd.add_seconds(exptime + overhead);
    }

    info!(
        "Night {}: {} visits, {} idle steps",
        context.night().jd,
        records.len(),
        idle_steps
    );
    Ok(records)
}
