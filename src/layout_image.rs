use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

use crate::model::{ChargeDensityModel, GeometricRegion, LayerKind};

const BACKGROUND: Rgb<u8> = Rgb([12, 14, 20]);
const BULK: Rgb<u8> = Rgb([70, 74, 82]);
const PIXEL: Rgb<u8> = Rgb([40, 120, 230]);
const GUARD: Rgb<u8> = Rgb([240, 150, 40]);

/// Height at which a region is sampled for the top view.
fn mid_height(region: &GeometricRegion) -> f64 {
    match region {
        GeometricRegion::Tube { z, translation, .. } => translation[2] + (z.0 + z.1) / 2.0,
        GeometricRegion::HexagonalPrism { translation, .. } => translation[2],
    }
}

fn lateral_extent(region: &GeometricRegion) -> f64 {
    match region {
        GeometricRegion::Tube { r, .. } => r.1,
        GeometricRegion::HexagonalPrism { outer_radius, .. } => *outer_radius,
    }
}

/// Rasterise a top view of the model: bulk disc, pixel implants and guard
/// rings. Gradient layers share the lateral extent of their parents and are
/// not drawn separately.
pub fn render_layout(model: &ChargeDensityModel, size: u32) -> RgbImage {
    let size = size.max(16);
    let mut img = ImageBuffer::from_pixel(size, size, BACKGROUND);

    let Some(bulk) = model.layers().iter().find(|l| l.kind == LayerKind::Bulk) else {
        return img;
    };
    let center = bulk.region.center();
    let half_width = lateral_extent(&bulk.region) * 1.05;
    let scale = 2.0 * half_width / size as f64;

    let drawn: Vec<_> = model
        .layers()
        .iter()
        .filter_map(|l| match l.kind {
            LayerKind::Bulk => Some((l, BULK)),
            LayerKind::Pixel => Some((l, PIXEL)),
            LayerKind::Guard => Some((l, GUARD)),
            _ => None,
        })
        .map(|(l, color)| {
            let c = l.region.center();
            (l, color, c, lateral_extent(&l.region), mid_height(&l.region))
        })
        .collect();

    for py in 0..size {
        for px in 0..size {
            let x = center.x - half_width + (px as f64 + 0.5) * scale;
            // image rows grow downwards
            let y = center.y + half_width - (py as f64 + 0.5) * scale;
            let mut color = None;
            for (layer, layer_color, c, extent, z) in &drawn {
                if (x - c.x).abs() > *extent || (y - c.y).abs() > *extent {
                    continue;
                }
                if layer.region.contains([x, y, *z]) {
                    color = Some(*layer_color);
                }
            }
            if let Some(color) = color {
                img.put_pixel(px, py, color);
            }
        }
    }
    img
}

pub fn save_image(img: &RgbImage, path: &Path) -> Result<(), String> {
    img.save(path).map_err(|e| format!("Failed to save image: {e}"))
}
