use egui::{
    pos2, Color32, InnerResponse, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Vec2,
};

use crate::{smooth_stroke, LoadedImage, SelectionState, Tool, ViewTransform};

const LASSO_STROKE: Stroke = Stroke {
    width: 2.0,
    color: Color32::RED,
};
const RECT_STROKE: Stroke = Stroke {
    width: 2.0,
    color: Color32::BLUE,
};
const DIM_COLOR: Color32 = Color32::from_black_alpha(128);

/// Fixed-size canvas that shows the loaded image and the active selection.
///
/// The widget feeds pointer events into the [`SelectionState`] machine and
/// repaints the whole scene from that state every frame: base image at the
/// fit transform, then the tool-specific decoration on top. Painting reads
/// the state but never mutates it, so two frames with unchanged state
/// produce identical output.
pub struct SelectionCanvas {
    size: Vec2,
}

impl SelectionCanvas {
    pub fn new(size: Vec2) -> Self {
        Self { size }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn ui(
        &self,
        ui: &mut egui::Ui,
        image: &LoadedImage,
        selection: &mut SelectionState,
    ) -> InnerResponse<ViewTransform> {
        let (canvas_rect, response) = ui.allocate_exact_size(self.size, Sense::drag());
        let transform = ViewTransform::fit(image.size(), self.size);

        // the state machine works in canvas-local coordinates
        let local = |p: Pos2| p - canvas_rect.min.to_vec2();
        if response.drag_started() {
            if let Some(p) = response.interact_pointer_pos() {
                selection.pointer_down(local(p));
            }
        }
        if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                selection.pointer_moved(local(p));
            }
        }
        if response.drag_stopped() && selection.pointer_up() {
            if let Some(smoothed) = smooth_stroke(selection.stroke(), self.size) {
                selection.replace_stroke(smoothed);
            }
        }

        self.paint(ui, canvas_rect, image, selection, transform);
        InnerResponse::new(transform, response)
    }

    fn paint(
        &self,
        ui: &egui::Ui,
        canvas_rect: Rect,
        image: &LoadedImage,
        selection: &SelectionState,
        transform: ViewTransform,
    ) {
        let painter = ui.painter().with_clip_rect(canvas_rect);
        let origin = canvas_rect.min.to_vec2();
        let uv_full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));

        let image_rect = transform.image_rect(image.size()).translate(origin);
        painter.image(image.texture_id(), image_rect, uv_full, Color32::WHITE);

        if selection.tool() == Tool::Lasso && !selection.stroke().is_empty() {
            let points: Vec<Pos2> = selection.stroke().iter().map(|&p| p + origin).collect();
            painter.add(Shape::closed_line(points, LASSO_STROKE));
        }

        if let Some(rect) = selection.rect() {
            if selection.overlay_dimmed() {
                painter.rect_filled(canvas_rect, 0.0, DIM_COLOR);
            }

            // repaint the rectangle interior sharp from the base image
            let outline = rect.normalized().translate(origin);
            let visible = outline.intersect(image_rect);
            if visible.is_positive() {
                let uv = Rect::from_min_max(
                    pos2(
                        (visible.min.x - image_rect.min.x) / image_rect.width(),
                        (visible.min.y - image_rect.min.y) / image_rect.height(),
                    ),
                    pos2(
                        (visible.max.x - image_rect.min.x) / image_rect.width(),
                        (visible.max.y - image_rect.min.y) / image_rect.height(),
                    ),
                );
                painter.image(image.texture_id(), visible, uv, Color32::WHITE);
            }

            painter.rect_stroke(outline, 0.0, RECT_STROKE, StrokeKind::Middle);
        }
    }
}
