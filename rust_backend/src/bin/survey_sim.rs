//! Survey night simulator.
//!
//! Builds (or loads) the tile catalog of a survey and simulates one or more
//! nights of an observing plan, always observing the tile the scheduler
//! selects. The visit log is written as JSON.
//!
//! # Usage
//!
//! ```bash
//! survey-sim --targets targets.json --tiles tiles.json \
//!     --plan plan.json --ephemeris sun.json --output visits.json
//!
//! # Reuse a catalog tiled earlier, simulate a single night
//! survey-sim --targets targets.json --catalog catalog.json \
//!     --plan plan.json --ephemeris sun.json --night 2459458
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (default: info)

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lvm_scheduler::astro::{ShadowCalculator, TabulatedEphemeris};
use lvm_scheduler::models::{load_tile_set, TargetList};
use lvm_scheduler::store::{JsonFileStore, TileStore};
use lvm_scheduler::{numeric, simulate_night, ObservationRecord, ObservingPlan, Scheduler, SurveyConfig, TileDb};

#[derive(Debug, Parser)]
#[command(name = "survey-sim", about = "Simulate survey nights with the greedy tile scheduler")]
struct Args {
    /// Survey configuration (TOML); defaults to ./survey.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target list (JSON)
    #[arg(long)]
    targets: PathBuf,

    /// Tile centres per target index (JSON); required unless --catalog is given
    #[arg(long)]
    tiles: Option<PathBuf>,

    /// Previously saved tile catalog (JSON)
    #[arg(long, conflicts_with = "tiles")]
    catalog: Option<PathBuf>,

    /// Save the tiled catalog here
    #[arg(long)]
    save_catalog: Option<PathBuf>,

    /// Observing plan (JSON)
    #[arg(long)]
    plan: PathBuf,

    /// Tabulated Sun positions (JSON)
    #[arg(long)]
    ephemeris: PathBuf,

    /// Simulate only this night (integer JD); all plan nights otherwise
    #[arg(long)]
    night: Option<i64>,

    /// Write the visit log here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct NightLog {
    jd: i64,
    visits: Vec<ObservationRecord>,
}

fn load_config(path: Option<&PathBuf>) -> Result<SurveyConfig> {
    let config = match path {
        Some(path) => SurveyConfig::from_file(path)
            .with_context(|| format!("reading configuration {}", path.display()))?,
        None => SurveyConfig::from_default_location().unwrap_or_else(|e| {
            warn!("{}; using default settings", e);
            SurveyConfig::default()
        }),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    // Also forwards the library's `log` records.
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    numeric::configure(config.numeric.policy);

    let targets = TargetList::from_file(&args.targets)
        .with_context(|| format!("reading targets {}", args.targets.display()))?;

    let db = match (&args.catalog, &args.tiles) {
        (Some(path), _) => TileDb::load(targets, &JsonFileStore::new(path))
            .with_context(|| format!("loading catalog {}", path.display()))?,
        (None, Some(path)) => {
            let tiles = load_tile_set(path).with_context(|| format!("reading tiles {}", path.display()))?;
            TileDb::tile_targets(targets, tiles, &config.overlap, config.tiledb.tileid_start)?
        }
        (None, None) => bail!("either --tiles or --catalog is required"),
    };
    info!("Catalog has {} tiles", db.len());

    if let Some(path) = &args.save_catalog {
        JsonFileStore::new(path)
            .save_catalog(db.catalog())
            .with_context(|| format!("saving catalog {}", path.display()))?;
        info!("Saved catalog to {}", path.display());
    }

    let plan = ObservingPlan::from_file(&args.plan)
        .with_context(|| format!("reading plan {}", args.plan.display()))?;
    let ephemeris = TabulatedEphemeris::from_file(&args.ephemeris)
        .with_context(|| format!("reading ephemeris {}", args.ephemeris.display()))?;

    let observatory = plan.observatory.clone();
    let shadow = ShadowCalculator::new(ephemeris, observatory.lon, observatory.lat, observatory.elevation);
    let scheduler = Scheduler::from_settings(observatory, &config.scheduler, shadow);

    let nights: Vec<i64> = match args.night {
        Some(jd) => vec![jd],
        None => plan.nights.iter().map(|n| n.jd).collect(),
    };

    let mut observed = vec![0.0; db.len()];
    let mut logs = Vec::with_capacity(nights.len());
    for jd in nights {
        let context = scheduler.prepare_for_night(jd, &plan, db.catalog())?;
        let visits = simulate_night(&scheduler, &context, &mut observed, &config.simulation)
            .with_context(|| format!("simulating night {}", jd))?;
        if visits.is_empty() {
            warn!("Night {} had no observable tiles", jd);
        }
        logs.push(NightLog { jd, visits });
    }

    let completed = observed
        .iter()
        .zip(&db.catalog().total_exptime)
        .filter(|&(&done, &total)| done >= total)
        .count();
    info!("Completed {} of {} tiles", completed, db.len());

    let json = serde_json::to_string_pretty(&logs)?;
    match &args.output {
        Some(path) => fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
