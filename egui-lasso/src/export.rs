use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::{rasterize_stroke, SelectionRect, SelectionState, Tool, ViewTransform};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode selection as png: {0}")]
    Encode(#[from] image::ImageError),
}

/// Rasterize the current selection against the original-resolution image.
///
/// Display-space geometry is mapped back to image space through the
/// inverse view transform, so the exported pixels agree with what the
/// canvas shows. Returns `None` when there is nothing exportable: no
/// rectangle, a lasso of fewer than three points, or a selection that
/// maps to a zero-area region.
pub fn export_selection(
    selection: &SelectionState,
    image: &DynamicImage,
    transform: ViewTransform,
) -> Option<RgbaImage> {
    match selection.tool() {
        Tool::Lasso => export_lasso(selection.stroke(), image, transform),
        Tool::Square => export_square(selection.rect()?, image, transform),
    }
}

/// Encode an exported selection as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Clip the source image to the stroke polygon: pixels outside become
/// fully transparent, the rest keep their source values.
fn export_lasso(
    stroke: &[egui::Pos2],
    image: &DynamicImage,
    transform: ViewTransform,
) -> Option<RgbaImage> {
    if stroke.len() < 3 {
        debug!("lasso export skipped: {} point(s)", stroke.len());
        return None;
    }

    let polygon: Vec<egui::Pos2> = stroke.iter().map(|&p| transform.to_image(p)).collect();
    let mask = rasterize_stroke(
        &polygon,
        image.width() as usize,
        image.height() as usize,
    );
    if mask.iter().all(|&m| m == 0) {
        debug!("lasso export skipped: selection outside the image");
        return None;
    }

    let mut out = image.to_rgba8();
    for (pixel, &covered) in out.pixels_mut().zip(&mask) {
        if covered == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    Some(out)
}

/// Crop the source image to the rectangle at native resolution.
fn export_square(
    rect: SelectionRect,
    image: &DynamicImage,
    transform: ViewTransform,
) -> Option<RgbaImage> {
    let display = rect.normalized();
    let min = transform.to_image(display.min);
    let max = transform.to_image(display.max);

    let x0 = min.x.round().clamp(0.0, image.width() as f32) as u32;
    let y0 = min.y.round().clamp(0.0, image.height() as f32) as u32;
    let x1 = max.x.round().clamp(0.0, image.width() as f32) as u32;
    let y1 = max.y.round().clamp(0.0, image.height() as f32) as u32;
    if x1 <= x0 || y1 <= y0 {
        debug!("rectangle export skipped: zero-area crop");
        return None;
    }

    Some(image.crop_imm(x0, y0, x1 - x0, y1 - y0).to_rgba8())
}
