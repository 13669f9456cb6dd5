//! Spherical polygons.
//!
//! A polygon is a closed ring of great-circle arcs between unit vectors, plus
//! one point known to be inside it. Containment is decided by counting how
//! many edges the arc from the interior point to the query point crosses.
//!
//! Every polygon also carries a bounding cap (interior point + angular
//! radius). Cap tests are used to reject far-away points and disjoint
//! polygons before any edge is looked at.
//!
//! Polygons are expected to be smaller than a hemisphere; the interior point
//! of a polygon built from vertices is their normalized centroid.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{Result, SchedulerError};

use super::vector::{angle_between, radec_to_vector, Vec3};

const EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct SphericalPolygon {
    vertices: Vec<Vec3>,
    interior: Vec3,
    cap_radius: f64,
}

impl SphericalPolygon {
    /// Polygon approximating the circle of `radius_deg` around (`ra_deg`, `dec_deg`).
    pub fn from_cone(ra_deg: f64, dec_deg: f64, radius_deg: f64, steps: usize) -> Result<Self> {
        if steps < 3 {
            return Err(SchedulerError::InvalidRegion(format!(
                "cone needs at least 3 steps, got {}",
                steps
            )));
        }
        if !(radius_deg > 0.0 && radius_deg < 90.0) {
            return Err(SchedulerError::InvalidRegion(format!(
                "cone radius must be in (0, 90) degrees, got {}",
                radius_deg
            )));
        }

        let (sin_r, cos_r) = radius_deg.to_radians().sin_cos();
        let (sin_d, cos_d) = dec_deg.to_radians().sin_cos();
        let ra0 = ra_deg.to_radians();

        let vertices = (0..steps)
            .map(|k| {
                let pa = 2.0 * PI * k as f64 / steps as f64;
                let (sin_pa, cos_pa) = pa.sin_cos();
                let sin_dec = sin_d * cos_r + cos_d * sin_r * cos_pa;
                let dec = sin_dec.clamp(-1.0, 1.0).asin();
                let ra = ra0 + (sin_pa * sin_r * cos_d).atan2(cos_r - sin_d * sin_dec);
                radec_to_vector(ra.to_degrees(), dec.to_degrees())
            })
            .collect();

        Ok(Self::with_interior(vertices, radec_to_vector(ra_deg, dec_deg)))
    }

    /// Polygon through the given vertices (degrees). A trailing vertex equal
    /// to the first one is dropped.
    pub fn from_radec(ra_deg: &[f64], dec_deg: &[f64]) -> Result<Self> {
        if ra_deg.len() != dec_deg.len() {
            return Err(SchedulerError::length_mismatch(
                "polygon declinations",
                ra_deg.len(),
                dec_deg.len(),
            ));
        }

        let mut vertices: Vec<Vec3> = ra_deg
            .iter()
            .zip(dec_deg)
            .map(|(&ra, &dec)| radec_to_vector(ra, dec))
            .collect();
        vertices.dedup_by(|a, b| angle_between(a, b) < EPS);
        if vertices.len() > 1 && angle_between(&vertices[0], &vertices[vertices.len() - 1]) < EPS {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(SchedulerError::InvalidRegion(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }

        let sum: Vec3 = vertices.iter().sum();
        let interior = sum.try_normalize(EPS).ok_or_else(|| {
            SchedulerError::InvalidRegion("polygon vertices have no well defined centre".into())
        })?;

        Ok(Self::with_interior(vertices, interior))
    }

    fn with_interior(vertices: Vec<Vec3>, interior: Vec3) -> Self {
        let max_angle = vertices
            .iter()
            .map(|v| angle_between(&interior, v))
            .fold(0.0_f64, f64::max);
        // Caps wider than a hemisphere are not convex; disable the shortcut.
        let cap_radius = if max_angle < FRAC_PI_2 { max_angle + 1e-9 } else { PI };
        Self {
            vertices,
            interior,
            cap_radius,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// The reference interior point.
    pub fn interior(&self) -> &Vec3 {
        &self.interior
    }

    /// Angular radius of the bounding cap, in degrees.
    pub fn cap_radius_deg(&self) -> f64 {
        self.cap_radius.to_degrees()
    }

    /// Cheap test: do the bounding caps of the two polygons overlap?
    pub fn caps_overlap(&self, other: &SphericalPolygon) -> bool {
        angle_between(&self.interior, &other.interior) <= self.cap_radius + other.cap_radius
    }

    /// Is the point (`ra_deg`, `dec_deg`) inside the polygon?
    pub fn contains_radec(&self, ra_deg: f64, dec_deg: f64) -> bool {
        self.contains_point(&radec_to_vector(ra_deg, dec_deg))
    }

    /// Is the unit vector `p` inside the polygon?
    pub fn contains_point(&self, p: &Vec3) -> bool {
        let distance = angle_between(&self.interior, p);
        if distance > self.cap_radius {
            return false;
        }
        if distance < EPS {
            return true;
        }

        let normal = self.interior.cross(p);
        let crossings = self
            .edges()
            .filter(|(a, b)| crosses_arc(&self.interior, p, &normal, a, b))
            .count();
        crossings % 2 == 0
    }

    /// Do the two polygons share any area?
    ///
    /// Disjoint bounding caps short-circuit to `false`. Otherwise the polygons
    /// intersect when any pair of edges crosses or one contains a vertex of
    /// the other.
    pub fn intersects(&self, other: &SphericalPolygon) -> bool {
        if !self.caps_overlap(other) {
            return false;
        }

        for (a, b) in self.edges() {
            if other.edges().any(|(c, d)| arcs_intersect(a, b, c, d)) {
                return true;
            }
        }

        self.contains_point(&other.vertices[0]) || other.contains_point(&self.vertices[0])
    }

    fn edges(&self) -> impl Iterator<Item = (&Vec3, &Vec3)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }
}

/// Does the edge `ab` cross the minor arc from `o` to `p`, whose plane has normal `n`?
///
/// Vertices lying exactly on that plane count as being on its negative side.
/// A vertex shared by two edges is then classified once, so the arc passing
/// through it adds one crossing where the boundary crosses and zero or two
/// where it only touches.
fn crosses_arc(o: &Vec3, p: &Vec3, n: &Vec3, a: &Vec3, b: &Vec3) -> bool {
    let sa = n.dot(a);
    let sb = n.dot(b);
    if (sa > 0.0) == (sb > 0.0) {
        return false;
    }
    // Non-negative weights: the point lies on the edge itself.
    let x = (b * sa - a * sb) / (sa - sb);
    o.cross(&x).dot(n) >= 0.0 && x.cross(p).dot(n) >= 0.0
}

/// Do the minor arcs `ab` and `cd` cross?
fn arcs_intersect(a: &Vec3, b: &Vec3, c: &Vec3, d: &Vec3) -> bool {
    let n1 = a.cross(b);
    let n2 = c.cross(d);
    let Some(mut x) = n1.cross(&n2).try_normalize(EPS) else {
        // Same great circle (or degenerate arc): treat as not crossing.
        return false;
    };
    if x.dot(&(a + b)) < 0.0 {
        x = -x;
    }
    on_arc(a, b, &n1, &x) && on_arc(c, d, &n2, &x)
}

/// Is `x`, known to lie on the great circle with normal `n` through `a` and `b`,
/// between them?
fn on_arc(a: &Vec3, b: &Vec3, n: &Vec3, x: &Vec3) -> bool {
    a.cross(x).dot(n) >= 0.0 && x.cross(b).dot(n) >= 0.0
}

#[cfg(test)]
mod tests {
    use crate::geometry::sample_perimeter;
    use super::*;

    fn square(ra0: f64, dec0: f64, half: f64) -> SphericalPolygon {
        SphericalPolygon::from_radec(
            &[ra0 - half, ra0 + half, ra0 + half, ra0 - half],
            &[dec0 - half, dec0 - half, dec0 + half, dec0 + half],
        )
        .unwrap()
    }

    #[test]
    fn cone_contains_centre_and_excludes_outside() {
        let cone = SphericalPolygon::from_cone(150.0, -30.0, 2.0, 64).unwrap();
        assert!(cone.contains_radec(150.0, -30.0));
        assert!(cone.contains_radec(151.0, -30.5));
        assert!(!cone.contains_radec(150.0, -32.5));
        assert!(!cone.contains_radec(330.0, 30.0));
    }

    #[test]
    fn cone_vertices_lie_on_circle() {
        let cone = SphericalPolygon::from_cone(10.0, 80.0, 5.0, 32).unwrap();
        let centre = radec_to_vector(10.0, 80.0);
        for v in cone.vertices() {
            assert!((angle_between(&centre, v).to_degrees() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn cone_rejects_bad_parameters() {
        assert!(SphericalPolygon::from_cone(0.0, 0.0, 1.0, 2).is_err());
        assert!(SphericalPolygon::from_cone(0.0, 0.0, 0.0, 16).is_err());
        assert!(SphericalPolygon::from_cone(0.0, 0.0, 95.0, 16).is_err());
    }

    #[test]
    fn polygon_containment_across_ra_seam() {
        let poly = square(0.0, 0.0, 3.0);
        assert!(poly.contains_radec(359.0, 1.0));
        assert!(poly.contains_radec(1.0, -1.0));
        assert!(!poly.contains_radec(5.0, 0.0));
    }

    #[test]
    fn concave_polygon() {
        // A square with a triangular notch cut into its lower edge.
        let poly = SphericalPolygon::from_radec(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 0.0],
            &[0.0, 0.0, 0.8, 0.0, 0.0, 4.0, 4.0],
        )
        .unwrap();
        assert!(poly.contains_radec(2.0, 3.0));
        assert!(poly.contains_radec(0.5, 0.3));
        assert!(poly.contains_radec(3.5, 0.2));
        assert!(!poly.contains_radec(2.2, 0.3));
    }

    #[test]
    fn closing_vertex_is_dropped() {
        let poly =
            SphericalPolygon::from_radec(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(poly.vertices().len(), 3);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let err = SphericalPolygon::from_radec(&[0.0, 1.0, 0.0], &[0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidRegion(_)));
        assert!(SphericalPolygon::from_radec(&[0.0, 1.0], &[0.0]).is_err());
    }

    #[test]
    fn overlapping_polygons_intersect() {
        let a = square(10.0, 0.0, 2.0);
        let b = square(12.0, 1.0, 2.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn nested_polygons_intersect() {
        let outer = SphericalPolygon::from_cone(50.0, 20.0, 5.0, 64).unwrap();
        let inner = square(50.0, 20.0, 0.5);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }

    #[test]
    fn disjoint_polygons_short_circuit_on_caps() {
        let a = square(10.0, 0.0, 1.0);
        let b = square(100.0, 0.0, 1.0);
        assert!(!a.caps_overlap(&b));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn caps_overlap_but_shapes_do_not() {
        // Two thin slivers whose caps overlap while the shapes stay apart.
        let a = SphericalPolygon::from_radec(&[0.0, 10.0, 10.0, 0.0], &[0.0, 0.0, 0.2, 0.2]).unwrap();
        let b = SphericalPolygon::from_radec(&[0.0, 10.0, 10.0, 0.0], &[1.0, 1.0, 1.2, 1.2]).unwrap();
        assert!(a.caps_overlap(&b));
        assert!(!a.intersects(&b));
    }

    fn sampled_box(ra0: f64, dec0: f64, half: f64) -> SphericalPolygon {
        let corners = [
            (ra0 - half, dec0 - half),
            (ra0 + half, dec0 - half),
            (ra0 + half, dec0 + half),
            (ra0 - half, dec0 + half),
        ];
        let (ra, dec): (Vec<f64>, Vec<f64>) = sample_perimeter(&corners, 1.0, 5).into_iter().unzip();
        SphericalPolygon::from_radec(&ra, &dec).unwrap()
    }

    #[test]
    fn points_beyond_boundary_samples_are_outside() {
        // Rays from the centroid along the centre meridian and parallel pass
        // straight through boundary samples.
        let poly = sampled_box(100.0, 0.0, 3.0);
        for k in 1..=38 {
            let offset = 3.0 + 0.025 * f64::from(k);
            assert!(!poly.contains_radec(100.0, offset), "(100, {}) reported inside", offset);
            assert!(!poly.contains_radec(100.0, -offset), "(100, -{}) reported inside", offset);
            assert!(!poly.contains_radec(100.0 + offset, 0.0), "({}, 0) reported inside", 100.0 + offset);
            assert!(!poly.contains_radec(100.0 - offset, 0.0), "({}, 0) reported inside", 100.0 - offset);
        }
        for k in 0..=28 {
            let offset = 0.1 * f64::from(k);
            assert!(poly.contains_radec(100.0, offset));
            assert!(poly.contains_radec(100.0 - offset, 0.0));
            assert!(poly.contains_radec(100.0 + offset, offset));
        }
    }

    #[test]
    fn arc_through_pointed_vertex_counts_once() {
        let diamond =
            SphericalPolygon::from_radec(&[100.0, 103.0, 100.0, 97.0], &[-3.0, 0.0, 3.0, 0.0]).unwrap();
        assert!(diamond.contains_radec(100.0, 2.5));
        assert!(diamond.contains_radec(102.5, 0.0));
        assert!(diamond.contains_radec(101.0, 1.0));
        assert!(!diamond.contains_radec(100.0, 3.5));
        assert!(!diamond.contains_radec(100.0, -3.5));
        assert!(!diamond.contains_radec(96.5, 0.0));
        assert!(!diamond.contains_radec(102.0, 2.0));
    }
}
