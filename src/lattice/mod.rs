//! Close-packed hexagonal pixel lattice.
//!
//! Pixels are placed ring by ring around the origin. Each new ring is found
//! by stepping from every centre of the previous ring in the six neighbour
//! directions (0°, 60°, ..., 300°) and keeping the positions not seen yet.

pub mod bulk;

use std::collections::HashSet;

/// Neighbour steps in axial lattice coordinates, in the same order as the
/// angles 0°, 60°, 120°, 180°, 240°, 300°.
const AXIAL_STEPS: [(i64, i64); 6] = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];

/// A pixel centre in the detector plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

impl Center {
    pub const ORIGIN: Center = Center { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the coordinate origin.
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Center) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Centre-to-centre spacing of hexagons with vertex radius `pixel_radius` and
/// a gap of `separation` between neighbouring edges.
pub fn pitch(pixel_radius: f64, separation: f64) -> f64 {
    3f64.sqrt() * pixel_radius + separation
}

/// The six neighbour offsets at the given spacing.
fn offsets(spacing: f64) -> [(f64, f64); 6] {
    std::array::from_fn(|k| {
        let theta = (60.0 * k as f64).to_radians();
        (spacing * theta.cos(), spacing * theta.sin())
    })
}

/// Place the first `n` pixel centres, origin first, then ring by ring.
///
/// Within a ring the order follows the previous ring's order, and for each
/// parent the six directions are scanned from 0°. Positions are deduplicated
/// on integer lattice coordinates, so a site reached from two parents is kept
/// once with the coordinates of the first parent that reached it.
///
/// `n` must be at least 1; `n == 0` yields an empty list.
pub fn place_centers(n: usize, pixel_radius: f64, separation: f64) -> Vec<Center> {
    if n == 0 {
        return Vec::new();
    }

    let steps = offsets(pitch(pixel_radius, separation));

    let mut centers = vec![Center::ORIGIN];
    let mut seen: HashSet<(i64, i64)> = HashSet::from([(0, 0)]);
    let mut frontier: Vec<((i64, i64), Center)> = vec![((0, 0), Center::ORIGIN)];

    while centers.len() < n {
        let mut next = Vec::with_capacity(frontier.len() * 6 + 6);
        for &((q, r), parent) in &frontier {
            for (&(dq, dr), &(dx, dy)) in AXIAL_STEPS.iter().zip(steps.iter()) {
                let site = (q + dq, r + dr);
                if seen.insert(site) {
                    let center = Center::new(parent.x + dx, parent.y + dy);
                    centers.push(center);
                    next.push((site, center));
                }
            }
        }
        frontier = next;
    }

    centers.truncate(n);
    centers
}

/// Number of complete hexagonal rings needed to hold `n` pixels.
///
/// Ring `k` adds `6k` positions to the single origin pixel.
pub fn rings_needed(n: usize) -> usize {
    let mut rings = 0;
    let mut capacity = 1;
    while capacity < n {
        rings += 1;
        capacity += 6 * rings;
    }
    rings
}

/// Whether `p` lies inside the regular hexagon of the given apothem centred at
/// `center`, with edges facing the lattice neighbour directions.
pub fn hex_contains(center: &Center, apothem: f64, p: (f64, f64)) -> bool {
    let dx = p.0 - center.x;
    let dy = p.1 - center.y;
    let half_sqrt3 = 3f64.sqrt() / 2.0;
    dx.abs() <= apothem
        && (0.5 * dx + half_sqrt3 * dy).abs() <= apothem
        && (-0.5 * dx + half_sqrt3 * dy).abs() <= apothem
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 5.15e-3;
    const S: f64 = 0.1e-3;

    #[test]
    fn test_single_pixel_is_origin() {
        assert_eq!(place_centers(1, R, S), vec![Center::ORIGIN]);
    }

    #[test]
    fn test_first_ring_order() {
        let centers = place_centers(7, R, S);
        let r = pitch(R, S);
        assert_eq!(centers.len(), 7);
        for (k, c) in centers[1..].iter().enumerate() {
            let angle = c.y.atan2(c.x).to_degrees().rem_euclid(360.0);
            assert!((angle - 60.0 * k as f64).abs() < 1e-9, "ring-1 pixel {k} at {angle}°");
            assert!((c.radius() - r).abs() < 1e-15);
        }
    }

    #[test]
    fn test_second_ring_has_twelve_sites() {
        let centers = place_centers(19, R, S);
        let r = pitch(R, S);
        let ring2: Vec<_> = centers[7..].iter().collect();
        assert_eq!(ring2.len(), 12);
        for c in ring2 {
            let d = c.radius();
            // corners at 2r, edge midpoints at sqrt(3) r
            assert!(
                (d - 2.0 * r).abs() < 1e-12 || (d - 3f64.sqrt() * r).abs() < 1e-12,
                "unexpected ring-2 radius {d}"
            );
        }
    }

    #[test]
    fn test_no_overlapping_pixels() {
        let centers = place_centers(61, R, S);
        let r = pitch(R, S);
        for (i, a) in centers.iter().enumerate() {
            for b in &centers[i + 1..] {
                assert!(a.distance(b) > r * 0.999);
            }
        }
    }

    #[test]
    fn test_rings_needed() {
        assert_eq!(rings_needed(1), 0);
        assert_eq!(rings_needed(2), 1);
        assert_eq!(rings_needed(7), 1);
        assert_eq!(rings_needed(8), 2);
        assert_eq!(rings_needed(19), 2);
        assert_eq!(rings_needed(20), 3);
        assert_eq!(rings_needed(37), 3);
    }

    #[test]
    fn test_hex_contains() {
        let c = Center::new(1.0, 1.0);
        assert!(hex_contains(&c, 0.5, (1.0, 1.0)));
        assert!(hex_contains(&c, 0.5, (1.49, 1.0)));
        assert!(!hex_contains(&c, 0.5, (1.51, 1.0)));
        // vertex direction reaches 2/sqrt(3) * apothem
        assert!(hex_contains(&c, 0.5, (1.0, 1.0 + 0.57)));
        assert!(!hex_contains(&c, 0.5, (1.0, 1.0 + 0.58)));
    }
}
