//! Columnar tile catalog.

use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::models::{TargetList, TileId, TileSet};
use crate::store::TileStore;

use super::checksum::target_checksum;

/// Status word of a tile that has not been touched yet.
pub const STATUS_NEW: i32 = 0;

/// One row per surviving tile, stored column by column.
///
/// Constraint columns are copies of the owning target's values at build time.
/// Row order is fixed once built; the row index is what the selector returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileCatalog {
    pub tile_id: Vec<TileId>,
    pub target_index: Vec<usize>,
    pub target: Vec<String>,
    pub telescope: Vec<String>,
    /// ICRS degrees
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
    pub pa: Vec<f64>,
    pub target_priority: Vec<f64>,
    pub tile_priority: Vec<f64>,
    pub airmass_limit: Vec<f64>,
    pub lunation_limit: Vec<f64>,
    /// Minimum shadow height, km
    pub hz_limit: Vec<f64>,
    /// Minimum moon separation, degrees
    pub moon_distance_limit: Vec<f64>,
    /// Seconds
    pub total_exptime: Vec<f64>,
    /// Seconds
    pub visit_exptime: Vec<f64>,
    pub status: Vec<i32>,
    /// First science tile id
    pub tileid_start: i64,
    /// SHA-256 of the target list the catalog was built from
    #[serde(default)]
    pub target_checksum: Option<String>,
}

impl TileCatalog {
    pub fn len(&self) -> usize {
        self.tile_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_id.is_empty()
    }

    /// Check that every column has one entry per row.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        let columns = [
            ("target_index", self.target_index.len()),
            ("target", self.target.len()),
            ("telescope", self.telescope.len()),
            ("ra", self.ra.len()),
            ("dec", self.dec.len()),
            ("pa", self.pa.len()),
            ("target_priority", self.target_priority.len()),
            ("tile_priority", self.tile_priority.len()),
            ("airmass_limit", self.airmass_limit.len()),
            ("lunation_limit", self.lunation_limit.len()),
            ("hz_limit", self.hz_limit.len()),
            ("moon_distance_limit", self.moon_distance_limit.len()),
            ("total_exptime", self.total_exptime.len()),
            ("visit_exptime", self.visit_exptime.len()),
            ("status", self.status.len()),
        ];
        for (name, len) in columns {
            if len != n {
                return Err(SchedulerError::length_mismatch(
                    &format!("catalog column {}", name),
                    n,
                    len,
                ));
            }
        }
        Ok(())
    }

    /// Row index of a tile id.
    pub fn index_of(&self, tile_id: TileId) -> Option<usize> {
        self.tile_id.iter().position(|&id| id == tile_id)
    }

    /// Highest target priority present in the catalog.
    pub fn max_target_priority(&self) -> Option<f64> {
        self.target_priority.iter().copied().reduce(f64::max)
    }

    /// Number of rows per target name.
    pub fn tiles_per_target(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for name in &self.target {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Set the status of one tile, in the store first and then in the catalog.
    ///
    /// The store must report exactly one affected row; anything else means
    /// the store and the catalog are out of sync and the catalog is left
    /// untouched.
    pub fn update_status<S: TileStore + ?Sized>(&mut self, store: &S, tile_id: TileId, status: i32) -> Result<()> {
        let index = self
            .index_of(tile_id)
            .ok_or(SchedulerError::TileNotFound(tile_id.value()))?;

        let affected = store.update_tile_status(tile_id, status)?;
        if affected != 1 {
            return Err(SchedulerError::StatusUpdateMismatch {
                tile_id: tile_id.value(),
                affected,
            });
        }

        self.status[index] = status;
        Ok(())
    }

    /// Reject a target list that differs from the one the catalog was built from.
    pub fn verify_targets(&self, targets: &TargetList) -> Result<()> {
        let Some(expected) = &self.target_checksum else {
            return Ok(());
        };
        let actual = target_checksum(targets)?;
        if &actual != expected {
            return Err(SchedulerError::ChecksumMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }
}

/// Flatten targets and their (already masked) tiles into a catalog.
///
/// Targets are visited in ascending index order and ids are assigned
/// sequentially from `id_start`. Nothing else is validated.
pub fn build_catalog(targets: &TargetList, tiles: &TileSet, id_start: i64) -> Result<TileCatalog> {
    if id_start < 0 {
        return Err(SchedulerError::NegativeTileIdStart(id_start));
    }

    let rows: usize = tiles.values().map(Vec::len).sum();
    let mut catalog = TileCatalog {
        tileid_start: id_start,
        ..Default::default()
    };
    reserve_all(&mut catalog, rows);

    let mut next_id = id_start;
    for (&index, target_tiles) in tiles {
        let target = targets.get(index).ok_or(SchedulerError::UnknownTargetIndex {
            index,
            count: targets.len(),
        })?;

        for tile in target_tiles {
            catalog.tile_id.push(TileId::new(next_id));
            catalog.target_index.push(index);
            catalog.target.push(target.name.clone());
            catalog.telescope.push(target.telescope.clone());
            catalog.ra.push(tile.ra);
            catalog.dec.push(tile.dec);
            catalog.pa.push(tile.pa);
            catalog.target_priority.push(target.priority);
            catalog.tile_priority.push(tile.priority);
            catalog.airmass_limit.push(target.max_airmass);
            catalog.lunation_limit.push(target.max_lunation);
            catalog.hz_limit.push(target.min_shadowheight.value());
            catalog.moon_distance_limit.push(target.min_moon_dist.value());
            catalog.total_exptime.push(target.total_exptime().value());
            catalog.visit_exptime.push(target.visit_exptime().value());
            catalog.status.push(STATUS_NEW);
            next_id += 1;
        }
    }

    info!(
        "Built tile catalog: {} tiles from {} targets, ids {}..{}",
        catalog.len(),
        tiles.len(),
        id_start,
        next_id
    );
    Ok(catalog)
}

fn reserve_all(catalog: &mut TileCatalog, rows: usize) {
    catalog.tile_id.reserve(rows);
    catalog.target_index.reserve(rows);
    catalog.target.reserve(rows);
    catalog.telescope.reserve(rows);
    catalog.ra.reserve(rows);
    catalog.dec.reserve(rows);
    catalog.pa.reserve(rows);
    catalog.target_priority.reserve(rows);
    catalog.tile_priority.reserve(rows);
    catalog.airmass_limit.reserve(rows);
    catalog.lunation_limit.reserve(rows);
    catalog.hz_limit.reserve(rows);
    catalog.moon_distance_limit.reserve(rows);
    catalog.total_exptime.reserve(rows);
    catalog.visit_exptime.reserve(rows);
    catalog.status.reserve(rows);
}
