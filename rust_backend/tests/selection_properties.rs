//! Property tests for catalog ids and selector soundness.

mod support;

use proptest::prelude::*;
use qtty::{Degrees, Seconds};

use lvm_scheduler::astro::altitude::SIDEREAL_DEG_PER_SECOND;
use lvm_scheduler::catalog::build_catalog;
use lvm_scheduler::models::{TargetList, Tile, TileSet};
use lvm_scheduler::{JulianDate, Scheduler, TileCatalog};

use support::{circle, equator_observatory, lst_deg, plan, ConstantShadow, NIGHT};

const T0: f64 = 2_459_458.75;
const ZENITH_LIMIT: f64 = 85.0;
const MIN_ALTITUDE: f64 = 30.0;
const MARGIN: f64 = 1e-6;

#[derive(Debug, Clone)]
struct TileSpec {
    ha: f64,
    dec: f64,
    priority: u8,
    tile_priority: u8,
    n_exposures: u32,
    visits_done: u32,
}

fn tile_spec() -> impl Strategy<Value = TileSpec> {
    (-90.0..90.0f64, -60.0..60.0f64, 0u8..3, 0u8..2, 1u32..4, 0u32..4).prop_map(
        |(ha, dec, priority, tile_priority, n_exposures, visits_done)| TileSpec {
            ha,
            dec,
            priority,
            tile_priority,
            n_exposures,
            visits_done: visits_done.min(n_exposures),
        },
    )
}

fn catalog(specs: &[TileSpec]) -> TileCatalog {
    let lst = lst_deg(T0);
    let mut targets = Vec::new();
    let mut tiles = TileSet::new();
    for (i, spec) in specs.iter().enumerate() {
        let ra = (lst - spec.ha).rem_euclid(360.0);
        let mut target = circle(&format!("t{}", i), f64::from(spec.priority), ra, spec.dec, 1.0);
        target.exptime = Seconds::new(300.0);
        target.n_exposures = spec.n_exposures;
        targets.push(target);
        tiles.insert(i, vec![Tile::new(ra, spec.dec).with_priority(f64::from(spec.tile_priority))]);
    }
    build_catalog(&TargetList::new(targets), &tiles, 0).unwrap()
}

/// Altitude seen from the equator, degrees.
fn altitude(ha: f64, dec: f64) -> f64 {
    (dec.to_radians().cos() * ha.to_radians().cos()).asin().to_degrees()
}

/// Clearly observable: every limit holds with room to spare.
fn clearly_valid(spec: &TileSpec) -> bool {
    let start = altitude(spec.ha, spec.dec);
    let end = altitude(spec.ha + 300.0 * SIDEREAL_DEG_PER_SECOND, spec.dec);
    let ok = |alt: f64| alt > MIN_ALTITUDE + MARGIN && alt < ZENITH_LIMIT - MARGIN;
    ok(start) && ok(end) && spec.visits_done < spec.n_exposures
}

/// Loosely observable: no limit is violated by more than rounding.
fn loosely_valid(spec: &TileSpec) -> bool {
    let start = altitude(spec.ha, spec.dec);
    let end = altitude(spec.ha + 300.0 * SIDEREAL_DEG_PER_SECOND, spec.dec);
    let ok = |alt: f64| alt > MIN_ALTITUDE - MARGIN && alt < ZENITH_LIMIT + MARGIN;
    ok(start) && ok(end) && spec.visits_done < spec.n_exposures
}

/// (effective priority, tile priority) used for ranking.
fn rank(spec: &TileSpec) -> (f64, f64) {
    let started = spec.visits_done > 0 && spec.visits_done < spec.n_exposures;
    let priority = if started { 3.0 } else { f64::from(spec.priority) };
    (priority, f64::from(spec.tile_priority))
}

proptest! {
    #[test]
    fn tile_ids_are_contiguous(counts in prop::collection::vec(0usize..6, 1..8), start in 0i64..100_000) {
        let targets = TargetList::new(
            (0..counts.len()).map(|i| circle(&format!("t{}", i), 1.0, 10.0 * i as f64, 0.0, 1.0)).collect(),
        );
        let tiles: TileSet = counts
            .iter()
            .enumerate()
            .map(|(i, &n)| (i, (0..n).map(|k| Tile::new(10.0 * i as f64, k as f64 * 0.1)).collect()))
            .collect();

        let catalog = build_catalog(&targets, &tiles, start).unwrap();
        let total: usize = counts.iter().sum();
        prop_assert_eq!(catalog.len(), total);
        for (offset, id) in catalog.tile_id.iter().enumerate() {
            prop_assert_eq!(id.value(), start + offset as i64);
        }
        prop_assert!(catalog.target_index.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(catalog.validate().is_ok());
    }

    #[test]
    fn selected_tile_is_valid_and_best_ranked(specs in prop::collection::vec(tile_spec(), 1..25)) {
        let catalog = catalog(&specs);
        let plan = plan(equator_observatory(), T0, 0.2);
        let scheduler = Scheduler::new(equator_observatory(), Degrees::new(90.0 - ZENITH_LIMIT), ConstantShadow(1.0e4));
        let context = scheduler.prepare_for_night(NIGHT, &plan, &catalog).unwrap();
        let observed: Vec<f64> = specs.iter().map(|s| 300.0 * f64::from(s.visits_done)).collect();

        let selection = scheduler.select_next(&context, JulianDate::new(T0), &observed).unwrap();
        let again = scheduler.select_next(&context, JulianDate::new(T0), &observed).unwrap();
        prop_assert_eq!(selection, again);

        match selection.index {
            None => {
                prop_assert!(specs.iter().all(|s| !clearly_valid(s)));
            }
            Some(chosen) => {
                prop_assert!(loosely_valid(&specs[chosen]));
                let best = rank(&specs[chosen]);
                let chosen_alt = altitude(specs[chosen].ha, specs[chosen].dec);
                for (j, other) in specs.iter().enumerate() {
                    if j == chosen || !clearly_valid(other) {
                        continue;
                    }
                    let r = rank(other);
                    prop_assert!(r <= best, "tile {} ranks {:?} above chosen {:?}", j, r, best);
                    if r == best {
                        prop_assert!(altitude(other.ha, other.dec) <= chosen_alt + MARGIN);
                    }
                }
            }
        }
    }
}
