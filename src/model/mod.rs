//! Charge-density model: layer primitives, the assembler and the script
//! emitted for SolidStateDetectors.jl.

pub mod assemble;
pub mod primitives;
pub mod region;
pub mod script;

pub use assemble::{assemble, build_layers, generate, ChargeDensityModel, GradientLayers, LayerSet};
pub use region::{
    DensityTerm, GeometricRegion, GradientKernel, Layer, LayerKind, ParentSide, RadialGradientTerm,
};
pub use script::{Script, Statement};
