//! In-memory tile store.

use std::sync::{Arc, RwLock};

use log::debug;

use super::{set_status, TileStore};
use crate::catalog::TileCatalog;
use crate::error::{Result, SchedulerError};
use crate::models::TileId;

/// In-memory tile store.
///
/// Clones share the same data, so a simulation and its caller can both hold
/// the store.
///
/// # Example
/// ```
/// use lvm_scheduler::catalog::TileCatalog;
/// use lvm_scheduler::store::{LocalTileStore, TileStore};
///
/// let store = LocalTileStore::new();
/// assert!(store.load_catalog().is_err());
/// store.save_catalog(&TileCatalog::default()).unwrap();
/// assert!(store.load_catalog().unwrap().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct LocalTileStore {
    data: Arc<RwLock<Option<TileCatalog>>>,
}

impl LocalTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `catalog`.
    pub fn with_catalog(catalog: TileCatalog) -> Self {
        Self {
            data: Arc::new(RwLock::new(Some(catalog))),
        }
    }
}

fn poisoned<T>(_: T) -> SchedulerError {
    SchedulerError::Store("local store lock poisoned".to_string())
}

impl TileStore for LocalTileStore {
    fn save_catalog(&self, catalog: &TileCatalog) -> Result<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        *data = Some(catalog.clone());
        Ok(())
    }

    fn load_catalog(&self) -> Result<TileCatalog> {
        let data = self.data.read().map_err(poisoned)?;
        data.clone()
            .ok_or_else(|| SchedulerError::Store("no catalog saved".to_string()))
    }

    fn update_tile_status(&self, tile_id: TileId, status: i32) -> Result<usize> {
        let mut data = self.data.write().map_err(poisoned)?;
        let affected = match data.as_mut() {
            Some(catalog) => set_status(catalog, tile_id, status),
            None => 0,
        };
        debug!("Tile {} status -> {} ({} rows)", tile_id, status, affected);
        Ok(affected)
    }
}
