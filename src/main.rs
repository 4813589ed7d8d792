mod app;
mod profile_display;

fn main() -> eframe::Result {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("CCD Charge Density Model"),
        ..Default::default()
    };

    eframe::run_native(
        "CCD Charge Density Model",
        options,
        Box::new(|cc| Ok(Box::new(app::DensityModelApp::new(cc)))),
    )
}
