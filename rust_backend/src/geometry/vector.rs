//! Unit vectors on the sphere.

use nalgebra::Vector3;

pub type Vec3 = Vector3<f64>;

/// Unit vector for a longitude/latitude pair in degrees.
pub fn radec_to_vector(ra_deg: f64, dec_deg: f64) -> Vec3 {
    let (sin_ra, cos_ra) = ra_deg.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();
    Vec3::new(cos_ra * cos_dec, sin_ra * cos_dec, sin_dec)
}

/// Longitude in `[0, 360)` and latitude in degrees of a (not necessarily unit) vector.
pub fn vector_to_radec(v: &Vec3) -> (f64, f64) {
    let ra = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);
    let dec = (v.z / v.norm()).clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}

/// Angle between two unit vectors, in radians.
///
/// Uses `atan2(|a×b|, a·b)`, which stays accurate for tiny and near-π angles.
pub fn angle_between(a: &Vec3, b: &Vec3) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Great-circle distance in degrees between two positions given in degrees.
pub fn great_circle_distance(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> f64 {
    angle_between(&radec_to_vector(ra1, dec1), &radec_to_vector(ra2, dec2)).to_degrees()
}
