//! Geometric regions, base densities and gradient kernels.
//!
//! These are plain values: they know how to evaluate themselves at a point,
//! but nothing about the script syntax they are emitted in.

use statrs::function::erf::{erf, erfc};

use crate::lattice::{hex_contains, Center};

/// A solid primitive of the simulator's geometry library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometricRegion {
    /// Full-turn cylinder or tube. `z` is relative to the translation.
    Tube {
        r: (f64, f64),
        z: (f64, f64),
        translation: [f64; 3],
    },
    /// Regular hexagonal prism (or hexagonal annulus when the inner radius is
    /// non-zero), centred on its translation. Radii are measured from the
    /// axis to a vertex; edges face the lattice neighbour directions.
    HexagonalPrism {
        inner_radius: f64,
        outer_radius: f64,
        thickness: f64,
        translation: [f64; 3],
        rotation: f64,
    },
}

impl GeometricRegion {
    pub fn contains(&self, p: [f64; 3]) -> bool {
        match *self {
            GeometricRegion::Tube { r, z, translation } => {
                let dx = p[0] - translation[0];
                let dy = p[1] - translation[1];
                let dz = p[2] - translation[2];
                let rho = (dx * dx + dy * dy).sqrt();
                rho >= r.0 && rho <= r.1 && dz >= z.0 && dz <= z.1
            }
            GeometricRegion::HexagonalPrism {
                inner_radius,
                outer_radius,
                thickness,
                translation,
                rotation,
            } => {
                if (p[2] - translation[2]).abs() > thickness / 2.0 {
                    return false;
                }
                let center = Center::new(translation[0], translation[1]);
                let (s, c) = (-rotation).sin_cos();
                let (dx, dy) = (p[0] - center.x, p[1] - center.y);
                let local = (center.x + c * dx - s * dy, center.y + s * dx + c * dy);
                if !hex_contains(&center, apothem(outer_radius), local) {
                    return false;
                }
                inner_radius <= 0.0 || !strictly_inside(&center, apothem(inner_radius), local)
            }
        }
    }

    /// Lateral centre of the region in the detector plane.
    pub fn center(&self) -> Center {
        match self {
            GeometricRegion::Tube { translation, .. }
            | GeometricRegion::HexagonalPrism { translation, .. } => {
                Center::new(translation[0], translation[1])
            }
        }
    }
}

fn apothem(vertex_radius: f64) -> f64 {
    vertex_radius * 3f64.sqrt() / 2.0
}

fn strictly_inside(center: &Center, apothem: f64, p: (f64, f64)) -> bool {
    hex_contains(center, apothem, p) && !on_edge(center, apothem, p)
}

fn on_edge(center: &Center, apothem: f64, p: (f64, f64)) -> bool {
    let dx = p.0 - center.x;
    let dy = p.1 - center.y;
    let h = 3f64.sqrt() / 2.0;
    [dx, 0.5 * dx + h * dy, -0.5 * dx + h * dy]
        .iter()
        .any(|d| d.abs() == apothem)
}

/// Base charge density of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityTerm {
    /// Uniform density (a linear density with zero gradients).
    Linear { constant: f64 },
    /// Density growing linearly with the distance from the z axis.
    Cylindrical { constant: f64, radial_slope: f64 },
}

impl DensityTerm {
    pub fn value_at(&self, p: [f64; 3]) -> f64 {
        match *self {
            DensityTerm::Linear { constant } => constant,
            DensityTerm::Cylindrical {
                constant,
                radial_slope,
            } => constant + radial_slope * (p[0] * p[0] + p[1] * p[1]).sqrt(),
        }
    }

    pub fn constant(&self) -> f64 {
        match *self {
            DensityTerm::Linear { constant } | DensityTerm::Cylindrical { constant, .. } => {
                constant
            }
        }
    }
}

/// Side of the kernel centre on which the doped parent layer lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSide {
    Below,
    Above,
}

/// Depth weighting of a gradient layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKernel {
    /// `exp(-(z - center)^2 / (2 straggle^2))`
    Gaussian { center: f64, straggle: f64 },
    /// Smoothed step tending to one on the side of the centre away from the
    /// parent layer: `erfc(-(z - center) / (2 straggle)) / 2` above a parent
    /// below, `(1 + erf(-(z - center) / (2 straggle))) / 2` below a parent
    /// above.
    ErrorFunction {
        center: f64,
        straggle: f64,
        parent: ParentSide,
    },
}

impl GradientKernel {
    pub fn weight(&self, z: f64) -> f64 {
        match *self {
            GradientKernel::Gaussian { center, straggle } => {
                (-(z - center).powi(2) / (2.0 * straggle * straggle)).exp()
            }
            GradientKernel::ErrorFunction {
                center,
                straggle,
                parent,
            } => {
                let u = (z - center) / (2.0 * straggle);
                match parent {
                    ParentSide::Below => erfc(-u) / 2.0,
                    ParentSide::Above => (1.0 + erf(-u)) / 2.0,
                }
            }
        }
    }

    pub fn center(&self) -> f64 {
        match *self {
            GradientKernel::Gaussian { center, .. }
            | GradientKernel::ErrorFunction { center, .. } => center,
        }
    }

    pub fn straggle(&self) -> f64 {
        match *self {
            GradientKernel::Gaussian { straggle, .. }
            | GradientKernel::ErrorFunction { straggle, .. } => straggle,
        }
    }
}

/// Radial variation of the bulk doping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadialGradientTerm {
    /// Carried by the bulk's [`DensityTerm::Cylindrical`]; adds nothing to the
    /// formula.
    Linear { slope: f64 },
    /// `height * (1 + erf((rho - shift) / (2 stdev))) / 2`, added to the bulk
    /// density inside the bulk region.
    ErrorFunction { stdev: f64, height: f64, shift: f64 },
}

impl RadialGradientTerm {
    pub fn additive_at(&self, p: [f64; 3]) -> f64 {
        match *self {
            RadialGradientTerm::Linear { .. } => 0.0,
            RadialGradientTerm::ErrorFunction {
                stdev,
                height,
                shift,
            } => {
                let rho = (p[0] * p[0] + p[1] * p[1]).sqrt();
                height * (1.0 + erf((rho - shift) / (2.0 * stdev))) / 2.0
            }
        }
    }
}

/// Which physical layer a region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Bulk,
    BottomContact,
    Pixel,
    Guard,
    BottomGradient,
    PixelGradient,
    GuardGradient,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Bulk => "bulk",
            LayerKind::BottomContact => "p+ contact",
            LayerKind::Pixel => "n+ pixel",
            LayerKind::Guard => "pspray/pstop",
            LayerKind::BottomGradient => "p+ gradient",
            LayerKind::PixelGradient => "n+ gradient",
            LayerKind::GuardGradient => "pspray gradient",
        }
    }
}

/// One (region, density, optional kernel) entry of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub region: GeometricRegion,
    pub density: DensityTerm,
    pub kernel: Option<GradientKernel>,
}

impl Layer {
    /// Contribution of this layer at `p`: indicator × base density × kernel.
    pub fn contribution(&self, p: [f64; 3]) -> f64 {
        if !self.region.contains(p) {
            return 0.0;
        }
        let base = self.density.value_at(p);
        match &self.kernel {
            Some(k) => base * k.weight(p[2]),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tube_bounds_relative_to_translation() {
        let tube = GeometricRegion::Tube {
            r: (0.0, 1.0),
            z: (0.0, 0.5),
            translation: [0.0, 0.0, 2.0],
        };
        assert!(tube.contains([0.5, 0.0, 2.25]));
        assert!(!tube.contains([0.5, 0.0, 0.25]));
        assert!(!tube.contains([1.5, 0.0, 2.25]));
    }

    #[test]
    fn test_annulus_excludes_core() {
        let ring = GeometricRegion::HexagonalPrism {
            inner_radius: 0.9,
            outer_radius: 1.0,
            thickness: 0.2,
            translation: [0.0, 0.0, 1.0],
            rotation: 0.0,
        };
        assert!(!ring.contains([0.0, 0.0, 1.0]));
        // edge midpoints of the two hexagons at 0.779 and 0.866
        assert!(ring.contains([0.85, 0.0, 1.0]));
        assert!(!ring.contains([0.75, 0.0, 1.0]));
        assert!(!ring.contains([0.85, 0.0, 1.2]));
        assert!(!ring.contains([0.9, 0.0, 1.0]));
        // vertices lie on the y axis
        assert!(ring.contains([0.0, 0.95, 1.0]));
    }

    #[test]
    fn test_gaussian_kernel_peaks_at_center() {
        let k = GradientKernel::Gaussian {
            center: 1.0,
            straggle: 0.1,
        };
        assert_eq!(k.weight(1.0), 1.0);
        assert!((k.weight(1.1) - (-0.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_erf_kernel_rises_away_from_parent() {
        let below = GradientKernel::ErrorFunction {
            center: 1.0,
            straggle: 0.1,
            parent: ParentSide::Below,
        };
        let above = GradientKernel::ErrorFunction {
            center: 1.0,
            straggle: 0.1,
            parent: ParentSide::Above,
        };
        assert!((below.weight(1.0) - 0.5).abs() < 1e-12);
        assert!((above.weight(1.0) - 0.5).abs() < 1e-12);
        assert!(below.weight(1.2) > 0.9);
        assert!(below.weight(0.8) < 0.1);
        assert!(above.weight(0.8) > 0.9);
        assert!(above.weight(1.2) < 0.1);
        // one straggle past the centre, u = 0.5
        assert!((below.weight(1.1) - erfc(-0.5) / 2.0).abs() < 1e-12);
        assert!((above.weight(0.9) - (1.0 + erf(0.5)) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cylindrical_density() {
        let d = DensityTerm::Cylindrical {
            constant: 1.0,
            radial_slope: 2.0,
        };
        assert!((d.value_at([3.0, 4.0, 0.0]) - 11.0).abs() < 1e-12);
    }
}
