//! Spherical geometry on the celestial sphere.
//!
//! All angles at the API surface are in degrees; internally points are unit
//! vectors in the ICRS equatorial frame.
//!
//! - [`vector`]: unit-vector helpers and great-circle distance
//! - [`frames`]: reference frames and Galactic → ICRS rotation
//! - [`boundary`]: perimeter sampling for rectangles and polygons
//! - [`polygon`]: spherical polygons with containment and intersection tests

pub mod boundary;
pub mod frames;
pub mod polygon;
pub mod vector;

pub use boundary::sample_perimeter;
pub use frames::Frame;
pub use polygon::SphericalPolygon;
pub use vector::{great_circle_distance, radec_to_vector, vector_to_radec, Vec3};
