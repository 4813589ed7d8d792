//! Custom charge-density model generator for hexagonal pixel detectors.
//!
//! Lays out a close-packed hexagonal pixel array and emits the
//! SolidStateDetectors.jl geometry and doping description for it.

pub mod error;
pub mod form;
pub mod lattice;
pub mod layout_image;
pub mod model;
pub mod params;
pub mod profile;
pub mod script_io;

pub use error::{ParameterViolation, PlausibilityWarning};
pub use form::{DetectorPreset, ParameterForm};
pub use lattice::bulk::enclosing_tube;
pub use lattice::{place_centers, rings_needed, Center};
pub use model::{generate, ChargeDensityModel};
pub use params::{ParameterRecord, ValidatedParameters};
