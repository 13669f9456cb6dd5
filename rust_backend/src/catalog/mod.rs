//! Tile catalog construction.
//!
//! A survey is turned into a catalog once: overlaps between targets are
//! resolved ([`overlap`]), masked tiles are dropped, and the survivors are
//! flattened into a columnar [`TileCatalog`] ([`table`]). [`TileDb`] bundles
//! the steps together with the target list the catalog belongs to.

pub mod checksum;
pub mod overlap;
pub mod table;

pub use checksum::{calculate_checksum, target_checksum};
pub use overlap::{resolve_overlaps, target_polygon, OverlapMasks};
pub use table::{build_catalog, TileCatalog, STATUS_NEW};

use log::info;

use crate::config::OverlapConfig;
use crate::error::Result;
use crate::models::{TargetList, TileId, TileSet};
use crate::store::TileStore;

/// A target list together with the tile catalog built from it.
#[derive(Debug, Clone)]
pub struct TileDb {
    targets: TargetList,
    catalog: TileCatalog,
}

impl TileDb {
    /// Resolve overlaps, drop overlapped tiles and build the catalog.
    ///
    /// The catalog records the checksum of `targets`, so it can later be
    /// checked against the target list it is loaded with.
    pub fn tile_targets(
        targets: TargetList,
        tiles: TileSet,
        overlap: &OverlapConfig,
        tileid_start: i64,
    ) -> Result<Self> {
        let masks = resolve_overlaps(&targets, &tiles, overlap)?;
        let (tiles, subsumed) = masks.remove_overlap(&targets, tiles)?;

        let mut catalog = build_catalog(&targets, &tiles, tileid_start)?;
        catalog.target_checksum = Some(target_checksum(&targets)?);
        info!(
            "Tiled {} targets into {} tiles ({} fully overlapped)",
            targets.len(),
            catalog.len(),
            subsumed.len()
        );

        Ok(Self { targets, catalog })
    }

    /// Load a catalog from `store` and check it belongs to `targets`.
    pub fn load<S: TileStore + ?Sized>(targets: TargetList, store: &S) -> Result<Self> {
        let catalog = store.load_catalog()?;
        catalog.validate()?;
        catalog.verify_targets(&targets)?;
        Ok(Self { targets, catalog })
    }

    pub fn save<S: TileStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save_catalog(&self.catalog)
    }

    /// Set the status of one tile in the store and in the catalog.
    pub fn update_status<S: TileStore + ?Sized>(&mut self, store: &S, tile_id: TileId, status: i32) -> Result<()> {
        self.catalog.update_status(store, tile_id, status)
    }

    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
