//! Tile catalog persistence.
//!
//! The scheduler only needs three things from a store: save a whole catalog,
//! load it back, and change the status word of one tile. Implementations:
//!
//! - [`LocalTileStore`]: in memory, for tests and simulations
//! - [`JsonFileStore`]: a single JSON document on disk

use crate::catalog::TileCatalog;
use crate::error::Result;
use crate::models::TileId;

pub mod json;
pub mod local;

pub use json::JsonFileStore;
pub use local::LocalTileStore;

/// Persistence backend for a tile catalog.
pub trait TileStore {
    /// Replace the stored catalog.
    fn save_catalog(&self, catalog: &TileCatalog) -> Result<()>;

    /// Load the stored catalog.
    fn load_catalog(&self) -> Result<TileCatalog>;

    /// Set the status of every row with `tile_id`.
    ///
    /// Returns the number of affected rows. Callers expect exactly one.
    fn update_tile_status(&self, tile_id: TileId, status: i32) -> Result<usize>;
}

/// Apply a status change to the rows of `catalog` matching `tile_id`.
pub(crate) fn set_status(catalog: &mut TileCatalog, tile_id: TileId, status: i32) -> usize {
    let mut affected = 0;
    for (id, row_status) in catalog.tile_id.iter().zip(catalog.status.iter_mut()) {
        if *id == tile_id {
            *row_status = status;
            affected += 1;
        }
    }
    affected
}
