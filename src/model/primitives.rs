//! Builders for the individual layers of the detector.
//!
//! Every builder is a pure function of a lateral position and the layer's
//! size parameters. Indices are assigned later, by the assembler.

use crate::lattice::bulk::BulkFootprint;
use crate::lattice::Center;
use crate::params::{RadialGradient, VerticalMode};

use super::region::{
    DensityTerm, GeometricRegion, GradientKernel, Layer, LayerKind, ParentSide, RadialGradientTerm,
};

/// Lift of the bottom gradient tube above the contact, so the two tubes do
/// not share a boundary plane.
pub const BOTTOM_GRADIENT_LIFT: f64 = 1e-9;

/// Gradient layers extend over four straggles.
const GRADIENT_SPAN: f64 = 4.0;

fn full_tube(radius: f64, height: f64, center: Center, z: f64) -> GeometricRegion {
    GeometricRegion::Tube {
        r: (0.0, radius),
        z: (0.0, height),
        translation: [center.x, center.y, z],
    }
}

fn flat(constant: f64) -> DensityTerm {
    DensityTerm::Linear { constant }
}

/// Bulk cylinder of height `height`. A linear radial gradient replaces the
/// flat bulk density by a cylindrical one.
pub fn bulk(
    footprint: &BulkFootprint,
    height: f64,
    concentration: f64,
    radial: &RadialGradient,
) -> Layer {
    let density = match *radial {
        RadialGradient::Linear { slope } => DensityTerm::Cylindrical {
            constant: concentration,
            radial_slope: slope,
        },
        RadialGradient::None | RadialGradient::ErrorFunction { .. } => flat(concentration),
    };
    Layer {
        kind: LayerKind::Bulk,
        region: full_tube(footprint.radius, height, footprint.center, 0.0),
        density,
        kernel: None,
    }
}

/// The radial term bound to the bulk, if any.
pub fn radial_term(radial: &RadialGradient) -> Option<RadialGradientTerm> {
    match *radial {
        RadialGradient::None => None,
        RadialGradient::Linear { slope } => Some(RadialGradientTerm::Linear { slope }),
        RadialGradient::ErrorFunction {
            stdev,
            height,
            shift,
        } => Some(RadialGradientTerm::ErrorFunction {
            stdev,
            height,
            shift,
        }),
    }
}

/// p+ contact covering the whole bottom face of the bulk.
pub fn bottom_contact(footprint: &BulkFootprint, thickness: f64, concentration: f64) -> Layer {
    Layer {
        kind: LayerKind::BottomContact,
        region: full_tube(footprint.radius, thickness, footprint.center, 0.0),
        density: flat(concentration),
        kernel: None,
    }
}

/// n+ implant of one pixel, flush with the top face at `height`.
pub fn pixel(
    center: Center,
    pixel_radius: f64,
    depth: f64,
    concentration: f64,
    height: f64,
) -> Layer {
    Layer {
        kind: LayerKind::Pixel,
        region: GeometricRegion::HexagonalPrism {
            inner_radius: 0.0,
            outer_radius: pixel_radius,
            thickness: depth,
            translation: [center.x, center.y, height - depth / 2.0],
            rotation: 0.0,
        },
        density: flat(concentration),
        kernel: None,
    }
}

/// Radius range of the guard annulus: the outer half of the gap around a pixel.
pub fn guard_radii(pixel_radius: f64, separation: f64, width: f64) -> (f64, f64) {
    let outer = pixel_radius + separation / 2.0;
    (outer - width / 2.0, outer)
}

/// pspray/pstop annulus around one pixel, flush with the top face.
pub fn guard(
    center: Center,
    pixel_radius: f64,
    separation: f64,
    width: f64,
    thickness: f64,
    concentration: f64,
    height: f64,
) -> Layer {
    let (inner, outer) = guard_radii(pixel_radius, separation, width);
    Layer {
        kind: LayerKind::Guard,
        region: GeometricRegion::HexagonalPrism {
            inner_radius: inner,
            outer_radius: outer,
            thickness,
            translation: [center.x, center.y, height - thickness / 2.0],
            rotation: 0.0,
        },
        density: flat(concentration),
        kernel: None,
    }
}

/// Kernel for a layer boundary at `boundary`, with the parent layer on
/// `parent` side. Error-function kernels are centred two straggles into the
/// gradient layer, Gaussian ones on the boundary itself.
pub fn kernel(
    mode: VerticalMode,
    boundary: f64,
    straggle: f64,
    parent: ParentSide,
) -> Option<GradientKernel> {
    let into_layer = match parent {
        ParentSide::Below => 1.0,
        ParentSide::Above => -1.0,
    };
    match mode {
        VerticalMode::None => None,
        VerticalMode::Gaussian => Some(GradientKernel::Gaussian {
            center: boundary,
            straggle,
        }),
        VerticalMode::ErrorFunction => Some(GradientKernel::ErrorFunction {
            center: boundary + into_layer * 2.0 * straggle,
            straggle,
            parent,
        }),
    }
}

/// Diffusion tail of the bottom contact, a tube of four straggles sitting on
/// top of the contact.
pub fn bottom_gradient(
    footprint: &BulkFootprint,
    thickness: f64,
    concentration: f64,
    straggle: f64,
    mode: VerticalMode,
) -> Layer {
    Layer {
        kind: LayerKind::BottomGradient,
        region: full_tube(
            footprint.radius,
            GRADIENT_SPAN * straggle,
            footprint.center,
            thickness + BOTTOM_GRADIENT_LIFT,
        ),
        density: flat(concentration),
        kernel: kernel(mode, thickness, straggle, ParentSide::Below),
    }
}

/// Diffusion tail below one pixel implant.
pub fn pixel_gradient(
    center: Center,
    pixel_radius: f64,
    depth: f64,
    concentration: f64,
    height: f64,
    straggle: f64,
    mode: VerticalMode,
) -> Layer {
    let span = GRADIENT_SPAN * straggle;
    Layer {
        kind: LayerKind::PixelGradient,
        region: GeometricRegion::HexagonalPrism {
            inner_radius: 0.0,
            outer_radius: pixel_radius,
            thickness: span,
            translation: [center.x, center.y, height - depth - span / 2.0],
            rotation: 0.0,
        },
        density: flat(concentration),
        kernel: kernel(mode, height - depth, straggle, ParentSide::Above),
    }
}

/// Diffusion tail below one guard annulus.
#[allow(clippy::too_many_arguments)]
pub fn guard_gradient(
    center: Center,
    pixel_radius: f64,
    separation: f64,
    width: f64,
    thickness: f64,
    concentration: f64,
    height: f64,
    straggle: f64,
    mode: VerticalMode,
) -> Layer {
    let (inner, outer) = guard_radii(pixel_radius, separation, width);
    let span = GRADIENT_SPAN * straggle;
    Layer {
        kind: LayerKind::GuardGradient,
        region: GeometricRegion::HexagonalPrism {
            inner_radius: inner,
            outer_radius: outer,
            thickness: span,
            translation: [center.x, center.y, height - thickness - span / 2.0],
            rotation: 0.0,
        },
        density: flat(concentration),
        kernel: kernel(mode, height - thickness, straggle, ParentSide::Above),
    }
}
