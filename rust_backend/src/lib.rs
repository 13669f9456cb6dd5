//! # LVM survey scheduler
//!
//! Tile catalog construction and greedy night scheduling for a wide-field
//! spectroscopic survey.
//!
//! A survey is a list of sky regions (targets), each covered by a set of
//! fixed pointings (tiles). Scheduling happens in two stages:
//!
//! 1. **Catalog building**, once per survey. Overlapping targets are resolved
//!    so that every patch of sky belongs to the highest priority target that
//!    covers it, and the surviving tiles are flattened into a columnar
//!    [`TileCatalog`] with stable integer ids.
//! 2. **Night scheduling**, repeatedly during a night. A [`Scheduler`]
//!    prepares a [`scheduler::NightContext`] from an [`ObservingPlan`] and
//!    then picks the next tile to observe given the exposure time already
//!    obtained for every tile.
//!
//! ## Architecture
//!
//! - [`geometry`]: unit vectors, frames and spherical polygons
//! - [`models`]: targets, tiles and id types
//! - [`catalog`]: overlap resolution and the tile catalog
//! - [`store`]: catalog persistence backends
//! - [`astro`]: sidereal time, altitudes, Sun ephemeris and shadow height
//! - [`plan`]: observatories and per-night almanac records
//! - [`scheduler`]: night preparation, tile selection and night simulation
//! - [`config`]: TOML survey configuration
//! - [`numeric`]: floating point error policy
//!
//! ## Example
//!
//! ```no_run
//! use lvm_scheduler::astro::{ShadowCalculator, TabulatedEphemeris};
//! use lvm_scheduler::models::{load_tile_set, TargetList};
//! use lvm_scheduler::{ObservingPlan, Scheduler, SurveyConfig, TileDb};
//!
//! # fn main() -> lvm_scheduler::Result<()> {
//! let config = SurveyConfig::from_default_location()?;
//! let targets = TargetList::from_file("targets.json")?;
//! let tiles = load_tile_set("tiles.json")?;
//! let db = TileDb::tile_targets(targets, tiles, &config.overlap, config.tiledb.tileid_start)?;
//!
//! let plan = ObservingPlan::from_file("plan.json")?;
//! let ephemeris = TabulatedEphemeris::from_file("sun.json")?;
//! let obs = plan.observatory.clone();
//! let shadow = ShadowCalculator::new(ephemeris, obs.lon, obs.lat, obs.elevation);
//! let scheduler = Scheduler::from_settings(obs, &config.scheduler, shadow);
//!
//! let night = scheduler.prepare_for_night(2_459_458, &plan, db.catalog())?;
//! let observed = vec![0.0; db.len()];
//! let next = scheduler.select_next(&night, night.evening_twilight(), &observed)?;
//! println!("next tile: {:?}", next.tile_id);
//! # Ok(())
//! # }
//! ```

pub mod astro;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod models;
pub mod numeric;
pub mod plan;
pub mod scheduler;
pub mod store;
pub mod time;

pub use catalog::{TileCatalog, TileDb};
pub use config::SurveyConfig;
pub use error::{Result, SchedulerError};
pub use numeric::FloatPolicy;
pub use plan::{NightRecord, Observatory, ObservingPlan};
pub use scheduler::{simulate_night, NightContext, ObservationRecord, Scheduler, Selection};
pub use time::JulianDate;
