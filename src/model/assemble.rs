//! Density assembler: orders the layers, assigns their indices and emits the
//! script statements.

use crate::lattice::bulk::{enclosing_tube, BulkFootprint, EXTRA_CLEARANCE};
use crate::lattice::{place_centers, rings_needed, Center};
use crate::params::ValidatedParameters;

use super::primitives;
use super::region::{Layer, LayerKind, RadialGradientTerm};
use super::script::{Script, Statement, MODULES};

/// Index of the first emitted region.
const FIRST_INDEX: usize = 1;

/// Diffusion-tail counterparts of the sharp layers.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientLayers {
    pub bottom: Layer,
    pub pixels: Vec<Layer>,
    /// Empty when no guard rings are built.
    pub guards: Vec<Layer>,
}

/// All layers of one detector, grouped by role.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    pub bulk: Layer,
    pub bottom: Layer,
    pub pixels: Vec<Layer>,
    /// Empty when no guard rings are built.
    pub guards: Vec<Layer>,
    pub gradients: Option<GradientLayers>,
    pub radial: Option<RadialGradientTerm>,
}

/// Lay out the detector: place the pixels and build every layer.
pub fn build_layers(params: &ValidatedParameters) -> LayerSet {
    let p = params.record();
    let centers = place_centers(p.pixel_count, p.pixel_radius, p.separation);
    let footprint = enclosing_tube(&centers, p.pixel_radius, p.separation, EXTRA_CLEARANCE);

    let bulk = primitives::bulk(&footprint, p.height, p.bulk_concentration, &p.radial);
    let bottom = primitives::bottom_contact(&footprint, p.bottom_thickness, p.bottom_concentration);

    let pixels = centers
        .iter()
        .map(|&c| {
            primitives::pixel(c, p.pixel_radius, p.implant_depth, p.implant_concentration, p.height)
        })
        .collect();

    let guards = if p.has_guards() {
        centers
            .iter()
            .map(|&c| {
                primitives::guard(
                    c,
                    p.pixel_radius,
                    p.separation,
                    p.guard_width,
                    p.guard_thickness,
                    p.guard_concentration,
                    p.height,
                )
            })
            .collect()
    } else {
        Vec::new()
    };

    let gradients = build_gradients(params, &centers, &footprint);

    LayerSet {
        bulk,
        bottom,
        pixels,
        guards,
        gradients,
        radial: primitives::radial_term(&p.radial),
    }
}

fn build_gradients(
    params: &ValidatedParameters,
    centers: &[Center],
    footprint: &BulkFootprint,
) -> Option<GradientLayers> {
    let p = params.record();
    let mode = p.vertical.mode();
    let straggle = p.vertical.straggle()?;

    let bottom = primitives::bottom_gradient(
        footprint,
        p.bottom_thickness,
        p.bottom_concentration,
        straggle.bottom,
        mode,
    );
    let pixels = centers
        .iter()
        .map(|&c| {
            primitives::pixel_gradient(
                c,
                p.pixel_radius,
                p.implant_depth,
                p.implant_concentration,
                p.height,
                straggle.implant,
                mode,
            )
        })
        .collect();
    let guards = match params.guard_straggle() {
        Some(guard_straggle) => centers
            .iter()
            .map(|&c| {
                primitives::guard_gradient(
                    c,
                    p.pixel_radius,
                    p.separation,
                    p.guard_width,
                    p.guard_thickness,
                    p.guard_concentration,
                    p.height,
                    guard_straggle,
                    mode,
                )
            })
            .collect(),
        None => Vec::new(),
    };

    Some(GradientLayers {
        bottom,
        pixels,
        guards,
    })
}

/// The assembled model: layers in emission order plus the optional radial
/// bulk term.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeDensityModel {
    layers: Vec<Layer>,
    radial: Option<RadialGradientTerm>,
}

/// Flatten a layer set in its fixed order: bulk, bottom contact, pixels,
/// guards, then the gradient layers of bottom, pixels and guards.
pub fn assemble(set: LayerSet) -> ChargeDensityModel {
    let LayerSet {
        bulk,
        bottom,
        pixels,
        guards,
        gradients,
        radial,
    } = set;

    let mut layers = Vec::with_capacity(2 + pixels.len() * 4 + 1);
    layers.push(bulk);
    layers.push(bottom);
    layers.extend(pixels);
    layers.extend(guards);
    if let Some(g) = gradients {
        layers.push(g.bottom);
        layers.extend(g.pixels);
        layers.extend(g.guards);
    }

    ChargeDensityModel { layers, radial }
}

impl ChargeDensityModel {
    /// Layers in emission order. Layer `i` is emitted with index `i + 1`.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn radial(&self) -> Option<&RadialGradientTerm> {
        self.radial.as_ref()
    }

    pub fn region_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of additive terms of the density formula, one per region.
    pub fn term_count(&self) -> usize {
        self.layers.len()
    }

    pub fn count_of(&self, kind: LayerKind) -> usize {
        self.layers.iter().filter(|l| l.kind == kind).count()
    }

    fn indexed(&self) -> impl Iterator<Item = (usize, &Layer)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (i + FIRST_INDEX, layer))
    }

    /// Ordered script statements: imports, struct fields, formula terms,
    /// constructors, instantiation.
    pub fn script(&self) -> Script {
        let mut script = Script::default();
        for module in MODULES {
            script.push(Statement::Using(module));
        }
        script.push(Statement::FloatType("Float32"));

        for (index, _) in self.indexed() {
            script.push(Statement::Field { index });
        }
        for (index, layer) in self.indexed() {
            let radial = match layer.kind {
                LayerKind::Bulk => self.radial,
                _ => None,
            };
            script.push(Statement::FormulaTerm {
                index,
                kernel: layer.kernel,
                radial,
            });
        }
        for (index, layer) in self.indexed() {
            script.push(Statement::Geometry {
                index,
                region: layer.region,
            });
            script.push(Statement::Density {
                index,
                term: layer.density,
            });
        }
        for (index, _) in self.indexed() {
            script.push(Statement::InstantiationArg { index });
        }
        script
    }

    /// The complete script text.
    pub fn render(&self) -> String {
        self.script().render()
    }

    /// Evaluate the density formula at `p`, the same sum the script declares.
    pub fn density_at(&self, p: [f64; 3]) -> f64 {
        self.layers
            .iter()
            .map(|layer| {
                let mut value = layer.contribution(p);
                if layer.kind == LayerKind::Bulk && layer.region.contains(p) {
                    if let Some(radial) = &self.radial {
                        value += radial.additive_at(p);
                    }
                }
                value
            })
            .sum()
    }
}

/// Build the complete model for validated parameters.
pub fn generate(params: &ValidatedParameters) -> ChargeDensityModel {
    let p = params.record();
    let model = assemble(build_layers(params));
    log::info!(
        "generated {} regions for {} pixels ({} rings, vertical gradient {}, radial gradient {})",
        model.region_count(),
        p.pixel_count,
        rings_needed(p.pixel_count),
        p.vertical.mode().name(),
        p.radial.mode().name(),
    );
    model
}
