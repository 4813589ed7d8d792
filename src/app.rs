use eframe::egui;

use ccd_density_model::form::{self, DetectorPreset, ParameterForm};
use ccd_density_model::params::{RadialMode, VerticalMode};
use ccd_density_model::profile::ProfileWindow;
use ccd_density_model::{
    generate, layout_image, rings_needed, script_io, ChargeDensityModel, ParameterRecord,
    ParameterViolation, PlausibilityWarning,
};

const LAYOUT_SIZE: u32 = 512;
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(230, 80, 80);
const WARNING_AMBER: egui::Color32 = egui::Color32::from_rgb(240, 180, 40);

pub struct DensityModelApp {
    form: ParameterForm,
    preset: DetectorPreset,
    model: Option<(ChargeDensityModel, ParameterRecord)>,
    script_text: String,
    violations: Vec<ParameterViolation>,
    warnings: Vec<PlausibilityWarning>,
    layout_texture: Option<egui::TextureHandle>,
    profile_window: ProfileWindow,
    needs_generate: bool,
    auto_generate: bool,
    generation_time_ms: f64,
    status: Option<String>,
}

impl DensityModelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let preset = DetectorPreset::Default;
        Self {
            form: preset.form(),
            preset,
            model: None,
            script_text: String::new(),
            violations: Vec::new(),
            warnings: Vec::new(),
            layout_texture: None,
            profile_window: ProfileWindow::Top,
            needs_generate: true,
            auto_generate: true,
            generation_time_ms: 0.0,
            status: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_parameters(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Parameters", &["json"])
            .pick_file()
        {
            match form::load_form(&path) {
                Ok(loaded) => {
                    self.form = loaded;
                    self.needs_generate = true;
                    self.status = Some(format!("Loaded {}", path.display()));
                }
                Err(e) => {
                    log::error!("{e}");
                    self.status = Some(e);
                }
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_parameters(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Parameters", &["json"])
            .set_file_name(format!("{}.json", self.form.name.trim()))
            .save_file()
        {
            self.status = Some(match form::save_form(&self.form, &path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            });
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_script(&mut self) {
        if self.model.is_none() {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Julia", &["jl"])
            .set_file_name(self.form.script_file_name())
            .save_file()
        {
            self.status = Some(match script_io::save_script(&self.script_text, &path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            });
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn export_layout(&mut self) {
        let Some((model, _)) = &self.model else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(format!("{}.png", self.form.name.trim()))
            .save_file()
        {
            let img = layout_image::render_layout(model, LAYOUT_SIZE * 2);
            self.status = Some(match layout_image::save_image(&img, &path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => e,
            });
        }
    }

    fn regenerate(&mut self, ctx: &egui::Context) {
        let start = web_time::Instant::now();
        match self.form.to_record().validate() {
            Ok(params) => {
                let model = generate(&params);
                self.script_text = model.render();
                self.generation_time_ms = start.elapsed().as_secs_f64() * 1000.0;

                let img = layout_image::render_layout(&model, LAYOUT_SIZE);
                let size = [img.width() as usize, img.height() as usize];
                let color_image = egui::ColorImage::from_rgb(size, img.as_raw());
                self.layout_texture = Some(ctx.load_texture(
                    "layout",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));

                self.violations.clear();
                self.warnings = params.warnings().to_vec();
                self.model = Some((model, params.into_record()));
            }
            Err(violations) => {
                self.violations = violations;
                self.warnings.clear();
                self.model = None;
                self.script_text.clear();
                self.layout_texture = None;
            }
        }
    }
}

impl eframe::App for DensityModelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel: file operations and preset selection
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                // native file dialogs
                #[cfg(not(target_arch = "wasm32"))]
                {
                    if ui.button("Open Parameters").clicked() {
                        self.open_parameters();
                    }
                    if ui.button("Save Parameters").clicked() {
                        self.save_parameters();
                    }
                    if ui.button("Save Script").clicked() {
                        self.save_script();
                    }
                    if ui.button("Export Layout").clicked() {
                        self.export_layout();
                    }
                    ui.separator();
                }

                ui.label("Preset:");
                egui::ComboBox::from_id_salt("detector_preset")
                    .selected_text(self.preset.name())
                    .show_ui(ui, |ui| {
                        for &preset in DetectorPreset::ALL {
                            if ui
                                .selectable_value(&mut self.preset, preset, preset.name())
                                .clicked()
                            {
                                let name = std::mem::take(&mut self.form.name);
                                self.form = ParameterForm { name, ..preset.form() };
                                self.needs_generate = true;
                            }
                        }
                    });

                ui.separator();
                ui.checkbox(&mut self.auto_generate, "Auto");

                if ui.button("Generate").clicked() {
                    self.needs_generate = true;
                }
                if ui.button("Reset").clicked() {
                    self.form = self.preset.form();
                    self.needs_generate = true;
                }

                ui.separator();
                if let Some((model, record)) = &self.model {
                    ui.label(format!(
                        "{} pixels | {} rings | {} regions | {:.1}ms",
                        record.pixel_count,
                        rings_needed(record.pixel_count),
                        model.region_count(),
                        self.generation_time_ms
                    ));
                }
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        // Left panel: controls
        egui::SidePanel::left("controls")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let mut changed = false;
                    changed |= ui_detector(ui, &mut self.form);
                    changed |= ui_layers(ui, &mut self.form);
                    changed |= ui_guard(ui, &mut self.form);
                    changed |= ui_vertical_gradient(ui, &mut self.form);
                    changed |= ui_radial_gradient(ui, &mut self.form);

                    if changed && self.auto_generate {
                        self.needs_generate = true;
                    }

                    ui.separator();
                    for v in &self.violations {
                        ui.colored_label(ERROR_RED, v.to_string());
                    }
                    for w in &self.warnings {
                        ui.colored_label(WARNING_AMBER, w.to_string());
                    }
                });
            });

        if self.needs_generate {
            self.regenerate(ctx);
            self.needs_generate = false;
        }

        // Central panel: layout, depth profile and script text
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some((model, record)) = &self.model else {
                ui.centered_and_justified(|ui| {
                    ui.label("Fix the parameters on the left to generate a model");
                });
                return;
            };

            ui.columns(2, |columns| {
                let ui = &mut columns[0];
                if let Some(tex) = &self.layout_texture {
                    let side = ui.available_width().min(LAYOUT_SIZE as f32);
                    ui.image(egui::load::SizedTexture::new(tex.id(), egui::vec2(side, side)));
                }
                ui.horizontal(|ui| {
                    for &window in ProfileWindow::ALL {
                        ui.selectable_value(&mut self.profile_window, window, window.name());
                    }
                });
                crate::profile_display::draw_profile(ui, model, record, self.profile_window);

                let ui = &mut columns[1];
                egui::ScrollArea::both().show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.script_text.as_str())
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
            });
        });
    }
}

// --- UI Section Builders ---

fn length_mm(ui: &mut egui::Ui, value: &mut f64, range: std::ops::RangeInclusive<f64>, label: &str) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .logarithmic(true)
            .text(label),
    )
    .changed()
}

fn scientific(ui: &mut egui::Ui, value: &mut f64, label: &str) -> bool {
    ui.horizontal(|ui| {
        let speed = value.abs().max(1.0) * 0.01;
        let changed = ui
            .add(
                egui::DragValue::new(value)
                    .speed(speed)
                    .custom_formatter(|v, _| format!("{v:e}"))
                    .custom_parser(|s| s.trim().parse::<f64>().ok()),
            )
            .changed();
        ui.label(label);
        changed
    })
    .inner
}

fn ui_detector(ui: &mut egui::Ui, form: &mut ParameterForm) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Detector")
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut form.name);
            });
            changed |= ui
                .add(egui::Slider::new(&mut form.pixel_count, 1..=169).text("Pixels"))
                .changed();
            changed |= length_mm(ui, &mut form.height_mm, 0.01..=20.0, "Height (mm)");
            changed |= length_mm(ui, &mut form.pixel_size_mm, 0.01..=50.0, "Pixel size (mm)");
            changed |= ui
                .add(egui::Slider::new(&mut form.separation_mm, 0.0..=2.0).text("Separation (mm)"))
                .changed();
        });
    changed
}

fn ui_layers(ui: &mut egui::Ui, form: &mut ParameterForm) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Doped Layers")
        .default_open(false)
        .show(ui, |ui| {
            changed |= length_mm(ui, &mut form.bottom_thickness_mm, 1e-4..=1.0, "p+ thickness (mm)");
            changed |= scientific(ui, &mut form.bottom_concentration, "p+ concentration");
            changed |= length_mm(ui, &mut form.implant_depth_mm, 1e-4..=1.0, "n+ thickness (mm)");
            changed |= scientific(ui, &mut form.implant_concentration, "n+ concentration");
            changed |= scientific(ui, &mut form.bulk_concentration, "Bulk concentration");
        });
    changed
}

fn ui_guard(ui: &mut egui::Ui, form: &mut ParameterForm) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("pspray / pstop")
        .default_open(false)
        .show(ui, |ui| {
            changed |= ui
                .add(egui::Slider::new(&mut form.guard_width_mm, 0.0..=1.0).text("Width (mm)"))
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut form.guard_thickness_mm, 0.0..=0.1)
                        .text("Thickness (mm)"),
                )
                .changed();
            changed |= scientific(ui, &mut form.guard_concentration, "Concentration");
        });
    changed
}

fn ui_vertical_gradient(ui: &mut egui::Ui, form: &mut ParameterForm) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("IDP Gradient")
        .default_open(false)
        .show(ui, |ui| {
            egui::ComboBox::from_label("Profile")
                .selected_text(form.vertical_mode.name())
                .show_ui(ui, |ui| {
                    for &mode in VerticalMode::ALL {
                        changed |= ui
                            .selectable_value(&mut form.vertical_mode, mode, mode.name())
                            .changed();
                    }
                });
            if form.vertical_mode != VerticalMode::None {
                changed |= length_mm(ui, &mut form.bottom_straggle_mm, 1e-6..=0.1, "p+ straggle (mm)");
                changed |= length_mm(ui, &mut form.implant_straggle_mm, 1e-6..=0.1, "n+ straggle (mm)");
                if form.guard_width_mm > 0.0 {
                    changed |= length_mm(
                        ui,
                        &mut form.guard_straggle_mm,
                        1e-6..=0.1,
                        "pspray straggle (mm)",
                    );
                }
            }
        });
    changed
}

fn ui_radial_gradient(ui: &mut egui::Ui, form: &mut ParameterForm) -> bool {
    let mut changed = false;
    egui::CollapsingHeader::new("Radial Bulk Gradient")
        .default_open(false)
        .show(ui, |ui| {
            egui::ComboBox::from_label("Radial profile")
                .selected_text(form.radial_mode.name())
                .show_ui(ui, |ui| {
                    for &mode in RadialMode::ALL {
                        changed |= ui
                            .selectable_value(&mut form.radial_mode, mode, mode.name())
                            .changed();
                    }
                });
            match form.radial_mode {
                RadialMode::None => {}
                RadialMode::Linear => {
                    changed |= scientific(ui, &mut form.radial_slope, "Slope");
                }
                RadialMode::ErrorFunction => {
                    changed |= length_mm(ui, &mut form.radial_stdev_mm, 1e-3..=1000.0, "Std. dev. (mm)");
                    changed |= scientific(ui, &mut form.radial_height, "Height");
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut form.radial_shift_mm, -1000.0..=1000.0)
                                .text("Shift (mm)"),
                        )
                        .changed();
                }
            }
        });
    changed
}
