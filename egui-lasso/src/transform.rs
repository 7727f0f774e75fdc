use egui::{Pos2, Rect, Vec2};

/// Mapping between original image pixel space and display canvas space.
///
/// The image is scaled uniformly so that it fits the canvas and centered
/// with letterbox/pillarbox offsets. The transform is derived from the
/// image and canvas sizes whenever either changes; it is never mutated
/// incrementally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub offset: Vec2,
}

impl ViewTransform {
    /// Compute the fit-and-center transform for an image inside a canvas.
    ///
    /// Degenerate (zero or negative) sizes yield the identity transform so
    /// callers never divide by zero.
    pub fn fit(image_size: Vec2, canvas_size: Vec2) -> Self {
        if image_size.x <= 0.0
            || image_size.y <= 0.0
            || canvas_size.x <= 0.0
            || canvas_size.y <= 0.0
        {
            return Self {
                scale: 1.0,
                offset: Vec2::ZERO,
            };
        }

        let scale = (canvas_size.x / image_size.x).min(canvas_size.y / image_size.y);
        let offset = (canvas_size - image_size * scale) * 0.5;
        Self { scale, offset }
    }

    /// Map a display-canvas point into image pixel coordinates.
    pub fn to_image(&self, p: Pos2) -> Pos2 {
        (((p - self.offset).to_vec2()) / self.scale).to_pos2()
    }

    /// Map an image-space point into display-canvas coordinates.
    pub fn to_display(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// The canvas-space rectangle covered by the scaled image.
    pub fn image_rect(&self, image_size: Vec2) -> Rect {
        Rect::from_min_size(self.offset.to_pos2(), image_size * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn fits_and_centers_the_image() {
        let t = ViewTransform::fit(vec2(400.0, 200.0), vec2(1200.0, 700.0));
        assert_eq!(t.scale, 3.0);
        assert_eq!(t.offset, vec2(0.0, 50.0));
    }

    #[test]
    fn pillarboxes_tall_images() {
        let t = ViewTransform::fit(vec2(100.0, 700.0), vec2(1200.0, 700.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset, vec2(550.0, 0.0));
    }

    #[test]
    fn degenerate_sizes_fall_back_to_identity() {
        let t = ViewTransform::fit(vec2(0.0, 0.0), vec2(1200.0, 700.0));
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset, Vec2::ZERO);

        let t = ViewTransform::fit(vec2(640.0, 480.0), Vec2::ZERO);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.offset, Vec2::ZERO);
    }

    #[test]
    fn display_image_round_trip() {
        let t = ViewTransform::fit(vec2(640.0, 480.0), vec2(1200.0, 700.0));
        let p = pos2(123.4, 567.8);
        let rt = t.to_display(t.to_image(p));
        assert!((rt - p).length() < 1e-3);
    }
}
