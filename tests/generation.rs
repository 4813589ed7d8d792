use ccd_density_model::form::{load_form, save_form, DetectorPreset, ParameterForm};
use ccd_density_model::script_io;
use ccd_density_model::model::script::literal;
use ccd_density_model::model::{generate, LayerKind};
use ccd_density_model::params::{ParameterRecord, RadialGradient, Straggle, VerticalGradient};
use ccd_density_model::{ParameterViolation, PlausibilityWarning};
use statrs::function::erf::erfc;

fn single_pixel() -> ParameterRecord {
    ParameterRecord {
        pixel_count: 1,
        pixel_radius: 5.15e-3,
        separation: 0.1e-3,
        height: 2e-3,
        bottom_thickness: 0.01e-3,
        implant_depth: 0.02e-3,
        guard_width: 0.0,
        guard_thickness: 0.0,
        bulk_concentration: 5e10,
        bottom_concentration: -1.9e16,
        implant_concentration: 1.9e16,
        guard_concentration: -1.9e16,
        vertical: VerticalGradient::None,
        radial: RadialGradient::None,
    }
}

fn formula(text: &str) -> &str {
    let start = text.find("function ").unwrap();
    let end = start + text[start..].find("\nend\n").unwrap();
    &text[start..end]
}

fn term_lines(text: &str) -> usize {
    formula(text).lines().filter(|l| l.starts_with("\t(pt in cdm.G")).count()
}

#[test]
fn single_pixel_script() {
    let model = generate(&single_pixel().validate().unwrap());
    let text = model.render();

    // the single pixel implant comes on top of bulk and contact
    assert_eq!(model.count_of(LayerKind::Pixel), 1);
    assert_eq!(model.region_count(), 3);
    assert_eq!(term_lines(&text), 3);

    assert!(text.starts_with(
        "using SolidStateDetectors\nusing IntervalSets\nusing SpecialFunctions\nT=Float32\n\n"
    ));
    let bulk_radius = 5.15e-3 + 0.1e-3 + 2e-3;
    assert!(text.contains(&format!(
        "G1 = SolidStateDetectors.Tube{{T}}(0.0..{},0..2π,0.0..0.002,CartesianPoint{{T}}(0.0, 0.0, 0.0))\n",
        literal(bulk_radius)
    )));
    assert!(text.contains(&format!(
        "G2 = SolidStateDetectors.Tube{{T}}(0.0..{},0..2π,0.0..{},CartesianPoint{{T}}(0.0, 0.0, 0.0))\n",
        literal(bulk_radius),
        literal(0.01e-3)
    )));
    assert!(text.contains(
        "CD1 = SolidStateDetectors.LinearChargeDensity{T}((0.0f0,0.0f0,50000000000.0),(0.0f0,0.0f0,0.0f0))\n"
    ));
    assert!(text.contains(
        "CD2 = SolidStateDetectors.LinearChargeDensity{T}((0.0f0,0.0f0,-1.9e16),(0.0f0,0.0f0,0.0f0))\n"
    ));
    assert!(text.contains(&format!(
        "G3 = SolidStateDetectors.HexagonalPrism{{T}}(0.0, {}, {},CartesianPoint{{T}}(0.0, 0.0, {}),0.0)\n",
        literal(5.15e-3),
        literal(0.02e-3),
        literal(2e-3 - 0.02e-3 / 2.0)
    )));
    assert!(text.ends_with("\nccdm = CustomChargeDensity(G1,CD1,G2,CD2,G3,CD3)\n"));
}

#[test]
fn formula_terms_match_regions() {
    let mut r = single_pixel();
    r.pixel_count = 7;
    r.guard_width = 0.05e-3;
    r.guard_thickness = 0.001e-3;
    r.vertical = VerticalGradient::ErrorFunction(Straggle {
        bottom: 3.7e-8,
        implant: 1.34e-7,
        guard: Some(2.5e-8),
    });
    let model = generate(&r.validate().unwrap());
    let text = model.render();
    let n = 7;

    assert_eq!(model.region_count(), 2 + 2 * n + 1 + 2 * n);
    assert_eq!(term_lines(&text), model.term_count());
    assert_eq!(text.matches("::SolidStateDetectors.AbstractGeometry{T,N}").count(), model.region_count());
    assert_eq!(text.matches(" = SolidStateDetectors.HexagonalPrism{T}(").count(), 4 * n);
    assert_eq!(formula(&text).matches(" * erfc(-(pt[3]").count(), 1);
    assert_eq!(formula(&text).matches(" * (1 + erf(-(pt[3]").count(), 2 * n);

    let bottom = format!(
        " * erfc(-(pt[3]-({}))/(2*3.7e-8))/2",
        literal(0.01e-3 + 2.0 * 3.7e-8)
    );
    let implant = format!(
        " * (1 + erf(-(pt[3]-({}))/(2*1.34e-7)))/2",
        literal(2e-3 - 0.02e-3 - 2.0 * 1.34e-7)
    );
    let guard = format!(
        " * (1 + erf(-(pt[3]-({}))/(2*2.5e-8)))/2",
        literal(2e-3 - 0.001e-3 - 2.0 * 2.5e-8)
    );
    assert_eq!(formula(&text).matches(&bottom).count(), 1);
    assert_eq!(formula(&text).matches(&implant).count(), n);
    assert_eq!(formula(&text).matches(&guard).count(), n);

    let last = 2 + 2 * n + 1 + 2 * n;
    assert!(text.contains(&format!("G{last},CD{last})\n")));
}

#[test]
fn erf_contact_tail_weight() {
    let mut r = single_pixel();
    let sigma = 3.7e-8;
    r.vertical = VerticalGradient::ErrorFunction(Straggle {
        bottom: sigma,
        implant: 1.34e-7,
        guard: None,
    });
    let model = generate(&r.validate().unwrap());
    let tail = model
        .layers()
        .iter()
        .find(|l| l.kind == LayerKind::BottomGradient)
        .unwrap();

    // just above the contact, well below the kernel centre
    let z = 0.01e-3 + 1e-9 + 0.2 * sigma;
    let u = (z - (0.01e-3 + 2.0 * sigma)) / (2.0 * sigma);
    let weight = tail.contribution([0.0, 0.0, z]) / -1.9e16;
    assert!((weight - erfc(-u) / 2.0).abs() < 1e-12);
    assert!((weight - 0.105).abs() < 1e-3);
}

#[test]
fn gaussian_kernels_centred_on_layer_boundaries() {
    let mut r = single_pixel();
    r.vertical = VerticalGradient::Gaussian(Straggle {
        bottom: 3.7e-8,
        implant: 1.34e-7,
        guard: None,
    });
    let model = generate(&r.validate().unwrap());
    assert_eq!(model.region_count(), 2 + 1 + 1 + 1);
    let text = model.render();
    assert!(text.contains(&format!(" * exp(-(pt[3]-({}))^2/(2*3.7e-8^2))", literal(0.01e-3))));
    assert!(text.contains(&format!(
        " * exp(-(pt[3]-({}))^2/(2*1.34e-7^2))",
        literal(2e-3 - 0.02e-3)
    )));
}

#[test]
fn linear_radial_gradient_uses_cylindrical_bulk() {
    let mut r = single_pixel();
    r.radial = RadialGradient::Linear { slope: 6e10 };
    let text = generate(&r.validate().unwrap()).render();
    assert!(text.contains(
        "CD1 = SolidStateDetectors.CylindricalChargeDensity{T}((0.0f0,0.0f0,50000000000.0),(60000000000.0,0.0f0,0.0f0))\n"
    ));
    assert!(!formula(&text).contains("erf("));
}

#[test]
fn wide_guard_still_generates() {
    let form = ParameterForm {
        pixel_count: 7,
        guard_width_mm: 0.3,
        guard_thickness_mm: 0.001,
        ..ParameterForm::default()
    };
    let params = form.to_record().validate().unwrap();
    assert!(matches!(
        params.warnings(),
        [PlausibilityWarning::GuardWiderThanSeparation { .. }]
    ));
    assert_eq!(generate(&params).region_count(), 2 + 2 * 7);
}

#[test]
fn invalid_record_is_rejected_before_generation() {
    let mut r = single_pixel();
    r.pixel_count = 0;
    r.pixel_radius = 0.0;
    let violations = r.validate().unwrap_err();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0], ParameterViolation::NoPixels);
}

#[test]
fn generation_is_idempotent() {
    for &preset in DetectorPreset::ALL {
        let record = preset.form().to_record();
        let a = generate(&record.clone().validate().unwrap()).render();
        let b = generate(&record.validate().unwrap()).render();
        assert_eq!(a, b, "{}", preset.name());
    }
}

#[test]
fn saved_form_regenerates_same_script() {
    let dir = std::env::temp_dir().join(format!("ccd_density_model_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut form = DetectorPreset::NineteenPixelGuarded.form();
    form.name = "hex19".to_string();
    let params_path = dir.join("hex19.json");
    save_form(&form, &params_path).unwrap();
    let loaded = load_form(&params_path).unwrap();
    assert_eq!(loaded, form);

    let text = generate(&loaded.to_record().validate().unwrap()).render();
    let script = script_io::save_script_in(&text, &dir, &loaded.script_file_name()).unwrap();
    assert!(script.ends_with("hex19.jl"));
    assert_eq!(std::fs::read_to_string(&script).unwrap(), text);

    std::fs::remove_dir_all(&dir).unwrap();
}
