use std::fs;
use std::ops::Index;
use std::path::Path;

use qtty::{Degrees, Kilometers, Seconds};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::Frame;

/// Sky region covered by a target, in the coordinates of the target's frame.
///
/// All values are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Region {
    /// Disc of `radius` around a centre.
    Circle { lon: f64, lat: f64, radius: f64 },
    /// Box of `width` x `height` (in longitude x latitude) around a centre.
    Rectangle {
        lon: f64,
        lat: f64,
        width: f64,
        height: f64,
    },
    /// Arbitrary polygon; the ring closes implicitly.
    Polygon { lon: Vec<f64>, lat: Vec<f64> },
}

impl Region {
    /// Corner vertices of a rectangle or polygon region. `None` for circles.
    pub fn vertices(&self) -> Option<Vec<(f64, f64)>> {
        match self {
            Region::Circle { .. } => None,
            Region::Rectangle {
                lon,
                lat,
                width,
                height,
            } => {
                let (hw, hh) = (width / 2.0, height / 2.0);
                Some(vec![
                    (lon - hw, lat - hh),
                    (lon + hw, lat - hh),
                    (lon + hw, lat + hh),
                    (lon - hw, lat + hh),
                ])
            }
            Region::Polygon { lon, lat } => {
                Some(lon.iter().copied().zip(lat.iter().copied()).collect())
            }
        }
    }
}

/// A named survey target with its region and observing constraints.
///
/// # Examples
///
/// ```
/// use lvm_scheduler::models::Target;
///
/// let target: Target = serde_json::from_str(r#"{
///     "name": "LMC",
///     "priority": 10.0,
///     "region": {"type": "circle", "lon": 80.9, "lat": -69.8, "radius": 4.0},
///     "max_airmass": 1.75,
///     "max_lunation": 0.25,
///     "min_shadowheight": 1000.0,
///     "min_moon_dist": 60.0,
///     "exptime": 900.0,
///     "n_exposures": 9,
///     "min_exposures": 3
/// }"#).unwrap();
///
/// assert_eq!(target.total_exptime().value(), 8100.0);
/// assert_eq!(target.visit_exptime().value(), 2700.0);
/// assert!(target.overlap);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    /// Higher is more important
    pub priority: f64,
    #[serde(default = "default_telescope")]
    pub telescope: String,
    #[serde(default)]
    pub frame: Frame,
    pub region: Region,
    pub max_airmass: f64,
    /// Maximum moon illumination fraction (0-1)
    pub max_lunation: f64,
    pub min_shadowheight: Kilometers,
    pub min_moon_dist: Degrees,
    /// Exposure time of a single exposure
    pub exptime: Seconds,
    pub n_exposures: u32,
    /// Exposures taken in one visit
    pub min_exposures: u32,
    /// Whether the target takes part in overlap resolution
    #[serde(default = "default_overlap")]
    pub overlap: bool,
}

fn default_telescope() -> String {
    "LVM-160".to_string()
}

fn default_overlap() -> bool {
    true
}

impl Target {
    /// Exposure time required to complete a tile.
    pub fn total_exptime(&self) -> Seconds {
        self.exptime * f64::from(self.n_exposures)
    }

    /// Exposure time of one visit (the scheduling quantum).
    pub fn visit_exptime(&self) -> Seconds {
        self.exptime * f64::from(self.min_exposures)
    }
}

/// Ordered, indexable collection of targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    /// Parse a JSON array of targets. Errors carry the path of the bad field.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let targets: Vec<Target> = serde_path_to_error::deserialize(de)?;
        Ok(Self { targets })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Target> {
        self.targets.iter()
    }

    /// Highest target priority, or `None` for an empty list.
    pub fn max_priority(&self) -> Option<f64> {
        self.targets.iter().map(|t| t.priority).reduce(f64::max)
    }

    /// Canonical JSON encoding, used for checksumming.
    pub fn to_canonical_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.targets)?)
    }
}

impl Index<usize> for TargetList {
    type Output = Target;

    fn index(&self, index: usize) -> &Target {
        &self.targets[index]
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

impl FromIterator<Target> for TargetList {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
