//! Tile store backed by a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::{set_status, TileStore};
use crate::catalog::TileCatalog;
use crate::error::Result;
use crate::models::TileId;

/// Stores the catalog as one pretty-printed JSON document.
///
/// Every status update rewrites the whole file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TileStore for JsonFileStore {
    fn save_catalog(&self, catalog: &TileCatalog) -> Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        fs::write(&self.path, json)?;
        info!("Saved {} tiles to {}", catalog.len(), self.path.display());
        Ok(())
    }

    fn load_catalog(&self) -> Result<TileCatalog> {
        let content = fs::read_to_string(&self.path)?;
        let de = &mut serde_json::Deserializer::from_str(&content);
        let catalog: TileCatalog = serde_path_to_error::deserialize(de)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn update_tile_status(&self, tile_id: TileId, status: i32) -> Result<usize> {
        let mut catalog = self.load_catalog()?;
        let affected = set_status(&mut catalog, tile_id, status);
        if affected > 0 {
            fs::write(&self.path, serde_json::to_string_pretty(&catalog)?)?;
        }
        Ok(affected)
    }
}
