//! Enclosing bulk cylinder for a placed lattice.

use super::Center;

/// Margin added to the bulk radius so that no pixel edge coincides with the
/// bulk boundary in the simulator's geometry engine.
pub const EXTRA_CLEARANCE: f64 = 2e-3;

/// Footprint shared by the bulk and the bottom contact tubes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkFootprint {
    pub radius: f64,
    /// Placement of the tube axis (centroid of the pixel centres).
    pub center: Center,
}

/// Radius and placement of the cylinder holding all `centers`.
///
/// The tube is translated to the centroid of the centres, while its radius is
/// the largest distance of any centre from the coordinate origin plus one
/// pixel radius, one separation and `extra_clearance`.
pub fn enclosing_tube(
    centers: &[Center],
    pixel_radius: f64,
    separation: f64,
    extra_clearance: f64,
) -> BulkFootprint {
    let n = centers.len().max(1) as f64;
    let (sx, sy) = centers
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
    let centroid = Center::new(sx / n, sy / n);

    let extent = centers.iter().map(Center::radius).fold(0.0, f64::max);
    let radius = extent + pixel_radius + separation + extra_clearance;

    log::debug!(
        "bulk footprint: radius={radius}, centroid=({}, {})",
        centroid.x,
        centroid.y
    );

    BulkFootprint { radius, center: centroid }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{pitch, place_centers};

    const R: f64 = 5.15e-3;
    const S: f64 = 0.1e-3;

    #[test]
    fn test_single_pixel_footprint() {
        let fp = enclosing_tube(&[Center::ORIGIN], R, S, EXTRA_CLEARANCE);
        assert_eq!(fp.center, Center::ORIGIN);
        assert!((fp.radius - (R + S + EXTRA_CLEARANCE)).abs() < 1e-18);
    }

    #[test]
    fn test_full_ring_is_centred() {
        let centers = place_centers(7, R, S);
        let fp = enclosing_tube(&centers, R, S, EXTRA_CLEARANCE);
        assert!(fp.center.x.abs() < 1e-15);
        assert!(fp.center.y.abs() < 1e-15);
        let expected = pitch(R, S) + R + S + EXTRA_CLEARANCE;
        assert!((fp.radius - expected).abs() < 1e-15);
    }

    #[test]
    fn test_radius_measured_from_origin_not_centroid() {
        let centers = [Center::ORIGIN, Center::new(1.0, 0.0)];
        let fp = enclosing_tube(&centers, 0.0, 0.0, 0.0);
        assert_eq!(fp.center, Center::new(0.5, 0.0));
        assert_eq!(fp.radius, 1.0);
    }
}
