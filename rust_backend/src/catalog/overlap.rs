//! Priority-based overlap resolution between target regions.
//!
//! Tiles of a target that fall inside the region of a strictly higher
//! priority target are masked out, so every patch of sky is tiled by the most
//! important target covering it. Only targets with the `overlap` flag set
//! take part, as maskers or as masked.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::OverlapConfig;
use crate::error::{Result, SchedulerError};
use crate::geometry::{sample_perimeter, SphericalPolygon};
use crate::models::{Region, Target, TargetList, TileSet};

/// Per-tile survival masks produced by [`resolve_overlaps`].
///
/// `true` means the tile is not inside any higher-priority target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapMasks {
    global: BTreeMap<usize, Vec<bool>>,
    pairwise: BTreeMap<(usize, usize), Vec<bool>>,
}

impl OverlapMasks {
    /// Combined mask of a participating target (AND over all pairs).
    pub fn global_no_overlap(&self, target: usize) -> Option<&[bool]> {
        self.global.get(&target).map(Vec::as_slice)
    }

    /// Mask of `lower`'s tiles against the single higher-priority target `higher`.
    pub fn pairwise(&self, lower: usize, higher: usize) -> Option<&[bool]> {
        self.pairwise.get(&(lower, higher)).map(Vec::as_slice)
    }

    /// Number of (lower, higher) pairs that were compared.
    pub fn pair_count(&self) -> usize {
        self.pairwise.len()
    }

    /// Drop every masked tile from `tiles`.
    ///
    /// Consumes the masks. Returns the remaining tiles and the names of
    /// targets whose tiles were all removed.
    pub fn remove_overlap(self, targets: &TargetList, mut tiles: TileSet) -> Result<(TileSet, Vec<String>)> {
        let mut subsumed = Vec::new();

        for (index, mask) in self.global {
            let target = targets.get(index).ok_or(SchedulerError::UnknownTargetIndex {
                index,
                count: targets.len(),
            })?;
            let Some(target_tiles) = tiles.get_mut(&index) else {
                continue;
            };
            if target_tiles.len() != mask.len() {
                return Err(SchedulerError::length_mismatch(
                    "overlap mask",
                    target_tiles.len(),
                    mask.len(),
                ));
            }

            let before = target_tiles.len();
            let mut keep = mask.iter();
            target_tiles.retain(|_| keep.next().copied().unwrap_or(true));

            if before > 0 && target_tiles.is_empty() {
                subsumed.push(target.name.clone());
            } else if target_tiles.len() < before {
                info!(
                    "Target {}: removed {} of {} tiles overlapping higher-priority targets",
                    target.name,
                    before - target_tiles.len(),
                    before
                );
            }
        }

        Ok((tiles, subsumed))
    }
}

/// Build the ICRS polygon of a target's region.
///
/// Circles become cones; rectangles and polygons are sampled along their
/// boundary in the target's own frame and then rotated to ICRS.
pub fn target_polygon(target: &Target, config: &OverlapConfig) -> Result<SphericalPolygon> {
    if let Region::Circle { lon, lat, radius } = target.region {
        let (ra, dec) = target.frame.to_icrs(lon, lat);
        return SphericalPolygon::from_cone(ra, dec, radius, config.cone_steps);
    }

    if let Region::Polygon { lon, lat } = &target.region {
        if lon.len() != lat.len() {
            return Err(SchedulerError::length_mismatch(
                &format!("polygon latitudes of target {}", target.name),
                lon.len(),
                lat.len(),
            ));
        }
    }

    let vertices = target.region.vertices().unwrap_or_default();
    let samples = sample_perimeter(&vertices, config.boundary_step_deg, config.min_boundary_points);
    let (ra, dec): (Vec<f64>, Vec<f64>) = samples
        .into_iter()
        .map(|(lon, lat)| target.frame.to_icrs(lon, lat))
        .unzip();

    SphericalPolygon::from_radec(&ra, &dec).map_err(|e| match e {
        SchedulerError::InvalidRegion(msg) => {
            SchedulerError::InvalidRegion(format!("target {}: {}", target.name, msg))
        }
        other => other,
    })
}

/// Compute which tiles survive priority-based overlap resolution.
///
/// Targets are visited in descending priority order. For every pair where
/// `i` has strictly higher priority than `j` and both participate, the tiles
/// of `j` are tested against `i`'s polygon; pairs whose polygons do not
/// intersect are skipped without any per-tile work. Targets whose tiles are
/// all masked are reported with a warning.
pub fn resolve_overlaps(targets: &TargetList, tiles: &TileSet, config: &OverlapConfig) -> Result<OverlapMasks> {
    if let Some(&index) = tiles.keys().find(|&&k| k >= targets.len()) {
        return Err(SchedulerError::UnknownTargetIndex {
            index,
            count: targets.len(),
        });
    }

    let mut order: Vec<usize> = (0..targets.len()).filter(|&i| targets[i].overlap).collect();
    // Stable sort: equal priorities keep index order.
    order.sort_by(|&a, &b| targets[b].priority.total_cmp(&targets[a].priority));

    let polygons = order
        .iter()
        .map(|&i| Ok((i, target_polygon(&targets[i], config)?)))
        .collect::<Result<BTreeMap<usize, SphericalPolygon>>>()?;

    let mut masks = OverlapMasks::default();

    for (pos, &j) in order.iter().enumerate() {
        let lower_tiles = tiles.get(&j).map(Vec::as_slice).unwrap_or_default();
        let mut global = vec![true; lower_tiles.len()];

        for &i in &order[..pos] {
            if targets[i].priority <= targets[j].priority {
                continue;
            }

            let start = Instant::now();
            let higher = &polygons[&i];
            let pair_mask: Vec<bool> = if higher.intersects(&polygons[&j]) {
                lower_tiles
                    .iter()
                    .map(|tile| !higher.contains_radec(tile.ra, tile.dec))
                    .collect()
            } else {
                vec![true; lower_tiles.len()]
            };

            for (g, &p) in global.iter_mut().zip(&pair_mask) {
                *g &= p;
            }
            debug!(
                "Overlap {} vs {}: {} of {} tiles masked in {:?}",
                targets[j].name,
                targets[i].name,
                pair_mask.iter().filter(|&&keep| !keep).count(),
                lower_tiles.len(),
                start.elapsed()
            );
            masks.pairwise.insert((j, i), pair_mask);
        }

        if !global.is_empty() && global.iter().all(|&keep| !keep) {
            warn!(
                "All tiles of target {} overlap higher-priority targets; it will not be observed",
                targets[j].name
            );
        }
        masks.global.insert(j, global);
    }

    Ok(masks)
}
