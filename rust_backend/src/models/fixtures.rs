//! Target and tile builders shared by unit tests.

use qtty::{Degrees, Kilometers, Seconds};

use super::{Region, Target, Tile};
use crate::geometry::Frame;

/// A circular ICRS target with permissive constraints: airmass 2, any moon,
/// no shadow height limit, one 900 s exposure per tile.
pub fn circle_target(name: &str, priority: f64, ra: f64, dec: f64, radius: f64) -> Target {
    Target {
        name: name.to_string(),
        priority,
        telescope: "LVM-160".to_string(),
        frame: Frame::Icrs,
        region: Region::Circle {
            lon: ra,
            lat: dec,
            radius,
        },
        max_airmass: 2.0,
        max_lunation: 1.0,
        min_shadowheight: Kilometers::new(0.0),
        min_moon_dist: Degrees::new(0.0),
        exptime: Seconds::new(900.0),
        n_exposures: 1,
        min_exposures: 1,
        overlap: true,
    }
}

/// A 3 x 3 grid of tiles spaced `step` degrees around (`ra`, `dec`).
pub fn grid_tiles(ra: f64, dec: f64, step: f64) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(9);
    for i in -1..=1 {
        for j in -1..=1 {
            tiles.push(Tile::new(ra + f64::from(i) * step, dec + f64::from(j) * step));
        }
    }
    tiles
}
