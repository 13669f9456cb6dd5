//! Survey domain models: targets, tiles and identifiers.
//!
//! These are the inputs of the tile catalog builder. Targets are immutable
//! once loaded; tiles are produced by an external tiling step and handed over
//! as a [`TileSet`] keyed by target index.

#[macro_use]
pub mod macros;
pub mod target;
pub mod tile;

pub use target::{Region, Target, TargetList};
pub use tile::{load_tile_set, Tile, TileId, TileSet};

#[cfg(test)]
pub(crate) mod fixtures;
