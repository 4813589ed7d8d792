use eframe::egui;

use ccd_density_model::profile::{depth_profile, signed_log10, ProfileWindow};
use ccd_density_model::{ChargeDensityModel, ParameterRecord};

const SCOPE_BG: egui::Color32 = egui::Color32::from_rgb(6, 8, 16);
const SCOPE_GRID: egui::Color32 = egui::Color32::from_rgb(20, 30, 25);
const SCOPE_BORDER: egui::Color32 = egui::Color32::from_rgb(35, 45, 40);
const TRACE_POSITIVE: egui::Color32 = egui::Color32::from_rgb(0, 190, 255);
const TRACE_NEGATIVE: egui::Color32 = egui::Color32::from_rgb(255, 80, 200);
const ZERO_LINE: egui::Color32 = egui::Color32::from_rgb(80, 90, 80);
const LABEL_DIM: egui::Color32 = egui::Color32::from_rgb(120, 130, 120);

const NUM_SAMPLES: usize = 600;

/// Plot the density along z through the first pixel centre. Depth runs left
/// (bottom contact) to right (pixel side); the vertical axis is signed log10.
pub fn draw_profile(
    ui: &mut egui::Ui,
    model: &ChargeDensityModel,
    record: &ParameterRecord,
    window: ProfileWindow,
) {
    let width = ui.available_width();
    let height = 160.0;
    let (response, painter) = ui.allocate_painter(egui::vec2(width, height), egui::Sense::hover());
    let rect = response.rect;

    draw_scope_bg(&painter, rect);

    let (x, y) = model
        .layers()
        .iter()
        .find(|l| l.kind == ccd_density_model::model::LayerKind::Pixel)
        .map(|l| {
            let c = l.region.center();
            (c.x, c.y)
        })
        .unwrap_or((0.0, 0.0));

    let z_range = window.range(record);
    let samples = depth_profile(model, x, y, z_range, NUM_SAMPLES);
    let logs: Vec<f64> = samples.iter().map(|&(_, v)| signed_log10(v)).collect();
    let span = logs.iter().fold(1.0f64, |m, v| m.max(v.abs()));

    let trace = egui::Rect::from_min_max(
        egui::pos2(rect.min.x + 4.0, rect.min.y + 14.0),
        egui::pos2(rect.max.x - 4.0, rect.max.y - 14.0),
    );
    let to_y = |v: f64| trace.center().y - (v / span) as f32 * trace.height() / 2.0;

    painter.line_segment(
        [
            egui::pos2(trace.min.x, trace.center().y),
            egui::pos2(trace.max.x, trace.center().y),
        ],
        egui::Stroke::new(0.5, ZERO_LINE),
    );

    let x_step = trace.width() / (logs.len() - 1) as f32;
    for i in 0..logs.len() - 1 {
        let x0 = trace.min.x + i as f32 * x_step;
        let x1 = x0 + x_step;
        let color = if logs[i] + logs[i + 1] >= 0.0 {
            TRACE_POSITIVE
        } else {
            TRACE_NEGATIVE
        };
        painter.line_segment(
            [egui::pos2(x0, to_y(logs[i])), egui::pos2(x1, to_y(logs[i + 1]))],
            egui::Stroke::new(1.2, color),
        );
    }

    let font = egui::FontId::monospace(9.0);
    painter.text(
        egui::pos2(rect.min.x + 3.0, rect.min.y + 2.0),
        egui::Align2::LEFT_TOP,
        format!("ρ(z) at ({:.3}, {:.3}) mm, ±1e{:.1}", x * 1e3, y * 1e3, span),
        font.clone(),
        LABEL_DIM,
    );
    painter.text(
        egui::pos2(rect.min.x + 3.0, rect.max.y - 2.0),
        egui::Align2::LEFT_BOTTOM,
        format!("z={:.4} mm", z_range.0 * 1e3),
        font.clone(),
        LABEL_DIM,
    );
    painter.text(
        egui::pos2(rect.max.x - 3.0, rect.max.y - 2.0),
        egui::Align2::RIGHT_BOTTOM,
        format!("z={:.4} mm", z_range.1 * 1e3),
        font,
        LABEL_DIM,
    );
}

fn draw_scope_bg(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 2.0, SCOPE_BG);
    painter.rect(
        rect,
        2.0,
        egui::Color32::TRANSPARENT,
        egui::Stroke::new(1.0, SCOPE_BORDER),
        egui::StrokeKind::Inside,
    );

    // Vertical grid (8 divisions)
    for i in 1..8 {
        let x = rect.min.x + rect.width() * i as f32 / 8.0;
        for y_step in 0..((rect.height() / 4.0) as usize) {
            let y = rect.min.y + y_step as f32 * 4.0;
            painter.line_segment(
                [egui::pos2(x, y), egui::pos2(x, y + 1.5)],
                egui::Stroke::new(0.5, SCOPE_GRID),
            );
        }
    }
}
