//! Operator-facing parameter form and detector presets.
//!
//! The form keeps lengths in millimetres, the way they are entered, and is
//! what gets saved to and loaded from JSON. [`ParameterForm::to_record`]
//! converts it into the simulator-unit [`ParameterRecord`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::params::{
    ParameterRecord, RadialGradient, RadialMode, Straggle, VerticalGradient, VerticalMode,
};

const MM: f64 = 1e-3;

pub const DEFAULT_NAME: &str = "unnamedIDP";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterForm {
    pub name: String,
    pub pixel_count: usize,
    pub height_mm: f64,
    /// Corner-to-corner width of one pixel hexagon.
    pub pixel_size_mm: f64,
    pub separation_mm: f64,

    pub guard_width_mm: f64,
    pub guard_thickness_mm: f64,
    /// Written to the script as entered. Older forms took p+ and pspray
    /// values ×1e3 and n+ and bulk values ×1e-9 of the emitted number.
    pub guard_concentration: f64,

    pub bottom_thickness_mm: f64,
    /// Unscaled, like every concentration of the form.
    pub bottom_concentration: f64,
    pub implant_depth_mm: f64,
    /// Unscaled; an old-style entry of 1.9e7 corresponds to 1.9e16 here.
    pub implant_concentration: f64,
    /// Unscaled; an old-style entry of 50 corresponds to 5e10 here.
    pub bulk_concentration: f64,

    pub vertical_mode: VerticalMode,
    pub bottom_straggle_mm: f64,
    pub implant_straggle_mm: f64,
    pub guard_straggle_mm: f64,

    pub radial_mode: RadialMode,
    pub radial_slope: f64,
    pub radial_stdev_mm: f64,
    pub radial_height: f64,
    pub radial_shift_mm: f64,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            pixel_count: 1,
            height_mm: 2.0,
            pixel_size_mm: 10.3,
            separation_mm: 0.1,

            guard_width_mm: 0.0,
            guard_thickness_mm: 0.0,
            guard_concentration: -1.9e16,

            bottom_thickness_mm: 0.01,
            bottom_concentration: -1.9e16,
            implant_depth_mm: 0.02,
            implant_concentration: 1.9e16,
            bulk_concentration: 5.0e10,

            vertical_mode: VerticalMode::None,
            bottom_straggle_mm: 0.037e-3,
            // sqrt(Dt) for D = 1e-14 cm^2/s over 5 h, cm -> mm
            implant_straggle_mm: (1e-14f64 * 3600.0 * 5.0).sqrt() * 10.0,
            guard_straggle_mm: 0.037e-3,

            radial_mode: RadialMode::None,
            radial_slope: 6e10,
            radial_stdev_mm: 100.0,
            radial_height: 8e10,
            radial_shift_mm: 700.0,
        }
    }
}

impl ParameterForm {
    /// Convert to simulator units. Only the gradient parameters of the selected
    /// modes are carried over.
    pub fn to_record(&self) -> ParameterRecord {
        let straggle = Straggle {
            bottom: self.bottom_straggle_mm * MM,
            implant: self.implant_straggle_mm * MM,
            guard: (self.guard_width_mm > 0.0).then_some(self.guard_straggle_mm * MM),
        };
        let vertical = match self.vertical_mode {
            VerticalMode::None => VerticalGradient::None,
            VerticalMode::Gaussian => VerticalGradient::Gaussian(straggle),
            VerticalMode::ErrorFunction => VerticalGradient::ErrorFunction(straggle),
        };
        let radial = match self.radial_mode {
            RadialMode::None => RadialGradient::None,
            RadialMode::Linear => RadialGradient::Linear {
                slope: self.radial_slope,
            },
            RadialMode::ErrorFunction => RadialGradient::ErrorFunction {
                stdev: self.radial_stdev_mm * MM,
                height: self.radial_height,
                shift: self.radial_shift_mm * MM,
            },
        };

        ParameterRecord {
            pixel_count: self.pixel_count,
            pixel_radius: self.pixel_size_mm * MM / 2.0,
            separation: self.separation_mm * MM,
            height: self.height_mm * MM,
            bottom_thickness: self.bottom_thickness_mm * MM,
            implant_depth: self.implant_depth_mm * MM,
            guard_width: self.guard_width_mm * MM,
            guard_thickness: self.guard_thickness_mm * MM,
            bulk_concentration: self.bulk_concentration,
            bottom_concentration: self.bottom_concentration,
            implant_concentration: self.implant_concentration,
            guard_concentration: self.guard_concentration,
            vertical,
            radial,
        }
    }

    /// File name of the generated script.
    pub fn script_file_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("{DEFAULT_NAME}.jl")
        } else {
            format!("{name}.jl")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPreset {
    Default,
    SevenPixel,
    NineteenPixelGuarded,
    GaussianImplants,
    RadialErf,
}

impl DetectorPreset {
    pub const ALL: &[DetectorPreset] = &[
        DetectorPreset::Default,
        DetectorPreset::SevenPixel,
        DetectorPreset::NineteenPixelGuarded,
        DetectorPreset::GaussianImplants,
        DetectorPreset::RadialErf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DetectorPreset::Default => "Single pixel",
            DetectorPreset::SevenPixel => "7 pixels",
            DetectorPreset::NineteenPixelGuarded => "19 pixels + pspray",
            DetectorPreset::GaussianImplants => "7 pixels, Gaussian IDP",
            DetectorPreset::RadialErf => "7 pixels, radial Erf bulk",
        }
    }

    /// Command-line spelling of the preset.
    pub fn key(self) -> &'static str {
        match self {
            DetectorPreset::Default => "default",
            DetectorPreset::SevenPixel => "seven",
            DetectorPreset::NineteenPixelGuarded => "nineteen-guarded",
            DetectorPreset::GaussianImplants => "gaussian",
            DetectorPreset::RadialErf => "radial-erf",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.key() == key)
    }

    pub fn form(self) -> ParameterForm {
        let base = ParameterForm::default();
        match self {
            DetectorPreset::Default => base,
            DetectorPreset::SevenPixel => ParameterForm {
                pixel_count: 7,
                ..base
            },
            DetectorPreset::NineteenPixelGuarded => ParameterForm {
                pixel_count: 19,
                guard_width_mm: 0.05,
                guard_thickness_mm: 0.001,
                ..base
            },
            DetectorPreset::GaussianImplants => ParameterForm {
                pixel_count: 7,
                vertical_mode: VerticalMode::Gaussian,
                ..base
            },
            DetectorPreset::RadialErf => ParameterForm {
                pixel_count: 7,
                radial_mode: RadialMode::ErrorFunction,
                ..base
            },
        }
    }
}

pub fn load_form(path: &Path) -> Result<ParameterForm, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read parameters: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse parameters: {e}"))
}

pub fn save_form(form: &ParameterForm, path: &Path) -> Result<(), String> {
    let text = serde_json::to_string_pretty(form)
        .map_err(|e| format!("Failed to encode parameters: {e}"))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to save parameters: {e}"))
}
