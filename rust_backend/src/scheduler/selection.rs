//! Selection result and the priority cascade.

use qtty::{Degrees, HourAngles, Kilometers};
use serde::{Deserialize, Serialize};

use crate::models::TileId;

/// Outcome of one call to [`Scheduler::select_next`](super::Scheduler::select_next).
///
/// `index` is `None` when no tile is observable; this is a normal outcome and
/// the remaining fields then carry the sidereal time and lunation only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Catalog row of the chosen tile
    pub index: Option<usize>,
    pub tile_id: Option<TileId>,
    pub lst: HourAngles,
    pub shadow_height: Kilometers,
    pub altitude: Degrees,
    pub lunation: f64,
}

impl Selection {
    pub(crate) fn none(lst: HourAngles, lunation: f64) -> Self {
        Self {
            index: None,
            tile_id: None,
            lst,
            shadow_height: Kilometers::new(0.0),
            altitude: Degrees::new(0.0),
            lunation,
        }
    }

    pub fn is_none(&self) -> bool {
        self.index.is_none()
    }
}

/// Pick one row out of `candidates`.
///
/// Highest `priority` first, then highest `tile_priority`, then highest
/// `altitude`. Remaining ties go to the lowest row index. Returns `None` only
/// when `candidates` is empty.
pub(crate) fn cascade(candidates: &[usize], priority: &[f64], tile_priority: &[f64], altitude: &[f64]) -> Option<usize> {
    let best_priority = candidates.iter().map(|&i| priority[i]).reduce(f64::max)?;
    let top: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| priority[i] == best_priority)
        .collect();

    let best_tile_priority = top.iter().map(|&i| tile_priority[i]).reduce(f64::max)?;

    let mut chosen: Option<usize> = None;
    for &i in top.iter().filter(|&&i| tile_priority[i] == best_tile_priority) {
        let better = match chosen {
            None => true,
            Some(c) => altitude[i] > altitude[c] || (altitude[i] == altitude[c] && i < c),
        };
        if better {
            chosen = Some(i);
        }
    }
    chosen
}
