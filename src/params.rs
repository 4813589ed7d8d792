//! Detector parameter record and the single validation pass in front of the
//! generator.
//!
//! All lengths are in simulator units (metres). Concentrations are passed
//! through to the emitted script unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterViolation, PlausibilityWarning};

/// Diffusion lengths of the vertically smeared implant layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Straggle {
    /// Bottom p+ contact.
    pub bottom: f64,
    /// Pixel n+ implants.
    pub implant: f64,
    /// Guard rings; required only when guard rings are built.
    pub guard: Option<f64>,
}

/// Vertical doping profile of the contact, implant and guard layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalGradient {
    /// Sharp layer boundaries.
    None,
    /// Gaussian tail centred on each layer boundary.
    Gaussian(Straggle),
    /// Complementary-error-function tail offset by two straggles.
    ErrorFunction(Straggle),
}

impl VerticalGradient {
    pub fn mode(&self) -> VerticalMode {
        match self {
            VerticalGradient::None => VerticalMode::None,
            VerticalGradient::Gaussian(_) => VerticalMode::Gaussian,
            VerticalGradient::ErrorFunction(_) => VerticalMode::ErrorFunction,
        }
    }

    pub fn straggle(&self) -> Option<&Straggle> {
        match self {
            VerticalGradient::None => None,
            VerticalGradient::Gaussian(s) | VerticalGradient::ErrorFunction(s) => Some(s),
        }
    }
}

/// Radial profile of the bulk doping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadialGradient {
    /// Flat bulk.
    None,
    /// Bulk density grows linearly with the distance from the axis.
    Linear { slope: f64 },
    /// Smoothed radial step of amplitude `height` at radius `shift`.
    ErrorFunction { stdev: f64, height: f64, shift: f64 },
}

impl RadialGradient {
    pub fn mode(&self) -> RadialMode {
        match self {
            RadialGradient::None => RadialMode::None,
            RadialGradient::Linear { .. } => RadialMode::Linear,
            RadialGradient::ErrorFunction { .. } => RadialMode::ErrorFunction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalMode {
    #[default]
    None,
    Gaussian,
    ErrorFunction,
}

impl VerticalMode {
    pub const ALL: &[VerticalMode] = &[
        VerticalMode::None,
        VerticalMode::Gaussian,
        VerticalMode::ErrorFunction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VerticalMode::None => "None",
            VerticalMode::Gaussian => "Gauss",
            VerticalMode::ErrorFunction => "Erf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadialMode {
    #[default]
    None,
    Linear,
    ErrorFunction,
}

impl RadialMode {
    pub const ALL: &[RadialMode] = &[RadialMode::None, RadialMode::Linear, RadialMode::ErrorFunction];

    pub fn name(self) -> &'static str {
        match self {
            RadialMode::None => "None",
            RadialMode::Linear => "Linear",
            RadialMode::ErrorFunction => "Erf",
        }
    }
}

/// Everything the generator needs to lay out one detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    pub pixel_count: usize,
    /// Hexagon vertex radius, half the corner-to-corner pixel width.
    pub pixel_radius: f64,
    pub separation: f64,
    pub height: f64,
    /// Bottom p+ contact thickness.
    pub bottom_thickness: f64,
    /// Pixel n+ implant depth.
    pub implant_depth: f64,
    pub guard_width: f64,
    pub guard_thickness: f64,
    pub bulk_concentration: f64,
    pub bottom_concentration: f64,
    pub implant_concentration: f64,
    pub guard_concentration: f64,
    pub vertical: VerticalGradient,
    pub radial: RadialGradient,
}

impl ParameterRecord {
    /// Guard rings are only built for a non-zero width.
    pub fn has_guards(&self) -> bool {
        self.guard_width > 0.0
    }

    /// Check every field in one pass and collect all violations.
    pub fn validate(self) -> Result<ValidatedParameters, Vec<ParameterViolation>> {
        let mut violations = Vec::new();

        if self.pixel_count < 1 {
            violations.push(ParameterViolation::NoPixels);
        }

        let positive = [("pixel radius", self.pixel_radius), ("detector height", self.height)];
        for (field, value) in positive {
            if !value.is_finite() {
                violations.push(ParameterViolation::NonFinite { field });
            } else if value <= 0.0 {
                violations.push(ParameterViolation::NonPositiveLength { field, value });
            }
        }

        let non_negative = [
            ("separation", self.separation),
            ("bottom contact thickness", self.bottom_thickness),
            ("implant depth", self.implant_depth),
            ("guard width", self.guard_width),
            ("guard thickness", self.guard_thickness),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() {
                violations.push(ParameterViolation::NonFinite { field });
            } else if value < 0.0 {
                violations.push(ParameterViolation::NegativeLength { field, value });
            }
        }

        let concentrations = [
            ("bulk concentration", self.bulk_concentration),
            ("bottom concentration", self.bottom_concentration),
            ("implant concentration", self.implant_concentration),
            ("guard concentration", self.guard_concentration),
        ];
        for (field, value) in concentrations {
            if !value.is_finite() {
                violations.push(ParameterViolation::NonFinite { field });
            }
        }

        if let Some(straggle) = self.vertical.straggle() {
            check_straggle(&mut violations, "bottom", straggle.bottom);
            check_straggle(&mut violations, "implant", straggle.implant);
            match straggle.guard {
                Some(guard) => check_straggle(&mut violations, "guard", guard),
                None if self.has_guards() => {
                    violations.push(ParameterViolation::MissingGuardStraggle)
                }
                None => {}
            }
        }

        match self.radial {
            RadialGradient::None => {}
            RadialGradient::Linear { slope } => {
                if !slope.is_finite() {
                    violations.push(ParameterViolation::NonFinite { field: "radial slope" });
                }
            }
            RadialGradient::ErrorFunction { stdev, height, shift } => {
                if !stdev.is_finite() {
                    violations.push(ParameterViolation::NonFinite { field: "radial stdev" });
                } else if stdev <= 0.0 {
                    violations.push(ParameterViolation::NonPositiveWidth {
                        field: "radial stdev",
                        value: stdev,
                    });
                }
                if !height.is_finite() {
                    violations.push(ParameterViolation::NonFinite { field: "radial height" });
                }
                if !shift.is_finite() {
                    violations.push(ParameterViolation::NonFinite { field: "radial shift" });
                }
            }
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        let mut warnings = Vec::new();
        if self.guard_width > self.separation {
            let warning = PlausibilityWarning::GuardWiderThanSeparation {
                width: self.guard_width,
                separation: self.separation,
            };
            log::warn!("{warning}; generating anyway");
            warnings.push(warning);
        }

        Ok(ValidatedParameters { record: self, warnings })
    }
}

fn check_straggle(violations: &mut Vec<ParameterViolation>, field: &'static str, value: f64) {
    if !value.is_finite() {
        violations.push(ParameterViolation::NonFinite { field });
    } else if value <= 0.0 {
        violations.push(ParameterViolation::NonPositiveStraggle { field, value });
    }
}

/// A record that passed [`ParameterRecord::validate`], plus the warnings it
/// raised. The generator only accepts this type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParameters {
    record: ParameterRecord,
    warnings: Vec<PlausibilityWarning>,
}

impl ValidatedParameters {
    pub fn record(&self) -> &ParameterRecord {
        &self.record
    }

    pub fn warnings(&self) -> &[PlausibilityWarning] {
        &self.warnings
    }

    pub fn into_record(self) -> ParameterRecord {
        self.record
    }

    /// Straggle of the guard layer, if guard gradient layers are built.
    pub(crate) fn guard_straggle(&self) -> Option<f64> {
        if !self.record.has_guards() {
            return None;
        }
        self.record.vertical.straggle().and_then(|s| s.guard)
    }
}
