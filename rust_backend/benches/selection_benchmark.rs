use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qtty::{Degrees, Kilometers, Seconds};

use lvm_scheduler::astro::{local_sidereal_time, ShadowHeightModel};
use lvm_scheduler::catalog::build_catalog;
use lvm_scheduler::config::OverlapConfig;
use lvm_scheduler::geometry::{Frame, Vec3};
use lvm_scheduler::models::{Region, Target, TargetList, Tile, TileSet};
use lvm_scheduler::{JulianDate, NightRecord, Observatory, ObservingPlan, Scheduler, TileCatalog};

const NIGHT: i64 = 2_459_458;

struct ConstantShadow;

impl ShadowHeightModel for ConstantShadow {
    fn shadow_heights(&self, _jd: JulianDate, _pointings: &[Vec3], mask: &[bool]) -> lvm_scheduler::Result<Vec<f64>> {
        Ok(mask.iter().map(|&m| if m { 1.0e4 } else { 0.0 }).collect())
    }
}

fn target(i: usize, ra: f64, dec: f64) -> Target {
    Target {
        name: format!("field{}", i),
        priority: (i % 7) as f64,
        telescope: "LVM-160".to_string(),
        frame: Frame::Icrs,
        region: Region::Circle {
            lon: ra,
            lat: dec,
            radius: 4.0,
        },
        max_airmass: 1.75,
        max_lunation: 1.0,
        min_shadowheight: Kilometers::new(0.0),
        min_moon_dist: Degrees::new(30.0),
        exptime: Seconds::new(900.0),
        n_exposures: 1,
        min_exposures: 1,
        overlap: true,
    }
}

/// Targets on a coarse grid, each with a 5 x 5 grid of tiles.
fn survey(n_targets: usize) -> (TargetList, TileSet) {
    let mut targets = Vec::with_capacity(n_targets);
    let mut tiles = TileSet::new();
    for i in 0..n_targets {
        let ra = (i as f64 * 17.0) % 360.0;
        let dec = -80.0 + (i as f64 * 11.0) % 100.0;
        targets.push(target(i, ra, dec));
        let mut field = Vec::with_capacity(25);
        for a in -2..=2 {
            for b in -2..=2 {
                field.push(Tile::new(ra + f64::from(a), dec + f64::from(b)));
            }
        }
        tiles.insert(i, field);
    }
    (TargetList::new(targets), tiles)
}

fn catalog(n_targets: usize) -> TileCatalog {
    let (targets, tiles) = survey(n_targets);
    build_catalog(&targets, &tiles, 1000).expect("catalog")
}

fn plan() -> ObservingPlan {
    ObservingPlan::new(
        Observatory::lco(),
        vec![NightRecord {
            jd: NIGHT,
            evening_twilight: JulianDate::new(2_459_458.55),
            morning_twilight: JulianDate::new(2_459_458.95),
            moon_ra: 120.0,
            moon_dec: -10.0,
            moon_phase: 0.4,
        }],
    )
}

fn bench_select_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_next");
    let plan = plan();
    let scheduler = Scheduler::new(Observatory::lco(), Degrees::new(5.0), ConstantShadow);
    let jd = JulianDate::new(2_459_458.7);

    for n_targets in [40, 400, 4000] {
        let catalog = catalog(n_targets);
        let context = scheduler.prepare_for_night(NIGHT, &plan, &catalog).expect("context");
        let observed = vec![0.0; catalog.len()];
        group.bench_with_input(BenchmarkId::new("tiles", catalog.len()), &observed, |b, observed| {
            b.iter(|| scheduler.select_next(black_box(&context), black_box(jd), black_box(observed)));
        });
    }
    group.finish();
}

fn bench_prepare_for_night(c: &mut Criterion) {
    let plan = plan();
    let scheduler = Scheduler::new(Observatory::lco(), Degrees::new(5.0), ConstantShadow);
    let catalog = catalog(400);
    c.bench_function("prepare_for_night_10000_tiles", |b| {
        b.iter(|| scheduler.prepare_for_night(black_box(NIGHT), &plan, black_box(&catalog)));
    });
}

fn bench_overlap(c: &mut Criterion) {
    let (targets, tiles) = survey(40);
    let config = OverlapConfig::default();
    c.bench_function("resolve_overlaps_40_targets", |b| {
        b.iter(|| lvm_scheduler::catalog::resolve_overlaps(black_box(&targets), black_box(&tiles), &config));
    });
}

fn bench_sidereal_time(c: &mut Criterion) {
    c.bench_function("local_sidereal_time", |b| {
        b.iter(|| local_sidereal_time(black_box(JulianDate::new(2_459_458.7)), black_box(Degrees::new(-70.69))));
    });
}

criterion_group!(
    benches,
    bench_select_next,
    bench_prepare_for_night,
    bench_overlap,
    bench_sidereal_time
);
criterion_main!(benches);
