//! Depth profiles of an assembled model.

use crate::model::ChargeDensityModel;
use crate::params::ParameterRecord;

/// Depth range shown by the profile plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileWindow {
    Full,
    Top,
    Bottom,
}

impl ProfileWindow {
    pub const ALL: &[ProfileWindow] = &[ProfileWindow::Full, ProfileWindow::Top, ProfileWindow::Bottom];

    pub fn name(self) -> &'static str {
        match self {
            ProfileWindow::Full => "Full depth",
            ProfileWindow::Top => "Pixel side",
            ProfileWindow::Bottom => "Contact side",
        }
    }

    /// z range covering the layers of interest, with their diffusion tails.
    pub fn range(self, p: &ParameterRecord) -> (f64, f64) {
        let tail = p
            .vertical
            .straggle()
            .map(|s| 4.0 * s.bottom.max(s.implant).max(s.guard.unwrap_or(0.0)))
            .unwrap_or(0.0);
        match self {
            ProfileWindow::Full => (0.0, p.height),
            ProfileWindow::Top => {
                let depth = p.implant_depth.max(p.guard_thickness) + tail;
                ((p.height - 2.0 * depth).max(0.0), p.height)
            }
            ProfileWindow::Bottom => (0.0, (2.0 * (p.bottom_thickness + tail)).min(p.height)),
        }
    }
}

/// Sample the density along z at the lateral position `(x, y)`.
pub fn depth_profile(
    model: &ChargeDensityModel,
    x: f64,
    y: f64,
    z_range: (f64, f64),
    samples: usize,
) -> Vec<(f64, f64)> {
    let samples = samples.max(2);
    let (z0, z1) = z_range;
    (0..samples)
        .map(|i| {
            let z = z0 + (z1 - z0) * i as f64 / (samples - 1) as f64;
            (z, model.density_at([x, y, z]))
        })
        .collect()
}

/// Signed logarithmic compression for plotting densities spanning many
/// decades with both signs.
pub fn signed_log10(v: f64) -> f64 {
    v.signum() * (1.0 + v.abs()).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::DetectorPreset;
    use crate::model::generate;

    #[test]
    fn test_profile_crosses_both_contacts() {
        let record = DetectorPreset::Default.form().to_record();
        let model = generate(&record.clone().validate().unwrap());
        let profile = depth_profile(&model, 0.0, 0.0, ProfileWindow::Full.range(&record), 2001);
        assert_eq!(profile.len(), 2001);
        assert!(profile.first().unwrap().1 < 0.0);
        // 5 µm below the top face, inside the implant
        assert!(profile[1995].1 > 1e16);
        assert!(profile.iter().any(|&(_, v)| v == 5e10));
    }

    #[test]
    fn test_top_window_covers_implant() {
        let record = DetectorPreset::GaussianImplants.form().to_record();
        let (z0, z1) = ProfileWindow::Top.range(&record);
        assert_eq!(z1, record.height);
        assert!(record.height - z0 > record.implant_depth);
    }

    #[test]
    fn test_signed_log10() {
        assert_eq!(signed_log10(0.0), 0.0);
        assert!((signed_log10(-99.0) + 2.0).abs() < 1e-12);
    }
}
