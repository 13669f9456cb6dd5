//! Perimeter sampling for region boundaries.

/// Samples the closed boundary through `vertices` every `step_deg` degrees.
///
/// Each edge is interpolated linearly in (lon, lat) with at least
/// `min_points` samples; the end vertex of an edge is the start of the next,
/// so no point is emitted twice. The ring is closed implicitly when the last
/// vertex differs from the first. Longitude steps across the 0/360 seam take
/// the short way round.
///
/// # Examples
///
/// ```
/// use lvm_scheduler::geometry::sample_perimeter;
///
/// let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
/// let samples = sample_perimeter(&square, 1.0, 5);
/// assert_eq!(samples.len(), 40);
/// ```
pub fn sample_perimeter(vertices: &[(f64, f64)], step_deg: f64, min_points: usize) -> Vec<(f64, f64)> {
    if vertices.len() < 2 {
        return vertices.to_vec();
    }

    let mut ring: Vec<(f64, f64)> = vertices.to_vec();
    if ring.first() != ring.last() {
        ring.push(ring[0]);
    }

    let mut out = Vec::new();
    for edge in ring.windows(2) {
        let (x1, y1) = edge[0];
        let (mut x2, y2) = edge[1];
        if x2 - x1 > 180.0 {
            x2 -= 360.0;
        } else if x1 - x2 > 180.0 {
            x2 += 360.0;
        }

        let dl = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        let by_step = if step_deg > 0.0 { (dl / step_deg) as usize } else { 0 };
        let n = by_step.max(min_points).max(1);

        for k in 0..n {
            let t = k as f64 / n as f64;
            let x = (x1 + t * (x2 - x1)).rem_euclid(360.0);
            out.push((x, y1 + t * (y2 - y1)));
        }
    }
    out
}
