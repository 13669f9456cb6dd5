use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

crate::define_id_type!(i64, TileId);

/// A single pointing of the telescope inside a target region.
///
/// Coordinates are ICRS degrees. `priority` only breaks ties between tiles of
/// the same target priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub ra: f64,
    pub dec: f64,
    #[serde(default)]
    pub pa: f64,
    #[serde(default)]
    pub priority: f64,
}

impl Tile {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self {
            ra,
            dec,
            pa: 0.0,
            priority: 0.0,
        }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// Tiles per target index, in target index order.
pub type TileSet = BTreeMap<usize, Vec<Tile>>;

/// Load a tile set from a JSON object keyed by target index.
pub fn load_tile_set<P: AsRef<Path>>(path: P) -> Result<TileSet> {
    let content = fs::read_to_string(path.as_ref())?;
    let de = &mut serde_json::Deserializer::from_str(&content);
    Ok(serde_path_to_error::deserialize(de)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_defaults() {
        let tile: Tile = serde_json::from_str(r#"{"ra": 10.0, "dec": -20.0}"#).unwrap();
        assert_eq!(tile, Tile::new(10.0, -20.0));
        assert_eq!(Tile::new(1.0, 2.0).with_priority(3.0).priority, 3.0);
    }

    #[test]
    fn tile_set_keys_parse_as_indices() {
        let set: TileSet =
            serde_json::from_str(r#"{"1": [{"ra": 1.0, "dec": 1.0}], "0": []}"#).unwrap();
        assert_eq!(set.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn tile_id_serializes_bare() {
        let id = TileId::new(1042);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1042");
        assert_eq!(i64::from(id), 1042);
        assert_eq!(id.to_string(), "1042");
    }
}
