use std::collections::HashMap;

use egui::{pos2, Pos2, Vec2};
use itertools::Itertools;
use log::debug;

/// Mask value for covered pixels.
const FILLED: u8 = 255;
/// Pixels count as inside a contour when their mask value exceeds this.
const ALPHA_THRESHOLD: u8 = 128;

/// Rasterize a closed polygon into a binary coverage mask.
///
/// Scanline fill with the even-odd rule, sampled at pixel centers. Covered
/// pixels are set to [`FILLED`], everything else stays zero. Polygons with
/// fewer than three vertices cover nothing.
pub fn rasterize_stroke(points: &[Pos2], width: usize, height: usize) -> Vec<u8> {
    let mut mask = vec![0u8; width * height];
    if points.len() < 3 || width == 0 {
        return mask;
    }

    let mut crossings = Vec::new();
    for (y, row) in mask.chunks_exact_mut(width).enumerate() {
        let scan_y = y as f32 + 0.5;

        crossings.clear();
        for (a, b) in points.iter().copied().circular_tuple_windows() {
            if (a.y <= scan_y) != (b.y <= scan_y) {
                let t = (scan_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            // pixel centers x + 0.5 inside [pair[0], pair[1])
            let x0 = (pair[0] - 0.5).ceil().max(0.0) as usize;
            let x1 = ((pair[1] - 0.5).ceil().max(0.0) as usize).min(width);
            if x0 < x1 {
                row[x0..x1].fill(FILLED);
            }
        }
    }
    mask
}

/// Replace a raw freehand stroke with its traced closed outline.
///
/// The stroke polygon is rasterized into a coverage mask of the canvas and
/// the mask boundary is traced back into a polygon, which both smooths the
/// jagged input and guarantees a non-self-intersecting outline. Returns
/// `None` for strokes of fewer than three points (nothing to rasterize);
/// those are left as they are. A stroke that covers no pixel at all traces
/// to an empty outline, clearing the selection.
pub fn smooth_stroke(points: &[Pos2], canvas_size: Vec2) -> Option<Vec<Pos2>> {
    if points.len() < 3 {
        return None;
    }
    let width = canvas_size.x.round().max(0.0) as usize;
    let height = canvas_size.y.round().max(0.0) as usize;
    if width == 0 || height == 0 {
        return None;
    }

    let mask = rasterize_stroke(points, width, height);
    let contours = trace_contours(&mask, width, height);
    debug!(
        "smoothed {}-point stroke into {} contour(s)",
        points.len(),
        contours.len()
    );

    // A simple stroke yields exactly one loop; self-intersecting input can
    // produce several, in which case the dominant one wins.
    Some(
        contours
            .into_iter()
            .max_by_key(|c| c.len())
            .unwrap_or_default(),
    )
}

/// Trace the iso-contours of a mask at the alpha threshold.
///
/// Classic marching squares: every 2x2 cell of samples contributes line
/// segments through its edge midpoints according to the 16-case table, and
/// the segments are linked into closed loops afterwards. The sweep is
/// padded by one cell on each side so regions touching the mask border
/// still close.
pub fn trace_contours(mask: &[u8], width: usize, height: usize) -> Vec<Vec<Pos2>> {
    let inside = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && (x as usize) < width
            && (y as usize) < height
            && mask[y as usize * width + x as usize] > ALPHA_THRESHOLD
    };

    let mut segments: Vec<(Pos2, Pos2)> = Vec::new();
    for y in -1..height as i32 {
        for x in -1..width as i32 {
            let case = inside(x, y) as u8
                | (inside(x + 1, y) as u8) << 1
                | (inside(x + 1, y + 1) as u8) << 2
                | (inside(x, y + 1) as u8) << 3;
            if case == 0 || case == 15 {
                continue;
            }

            // Samples sit on pixel centers; crossings on cell edge midpoints.
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let top = pos2(fx + 0.5, fy);
            let right = pos2(fx + 1.0, fy + 0.5);
            let bottom = pos2(fx + 0.5, fy + 1.0);
            let left = pos2(fx, fy + 0.5);

            match case {
                1 | 14 => segments.push((left, top)),
                2 | 13 => segments.push((top, right)),
                3 | 12 => segments.push((left, right)),
                4 | 11 => segments.push((right, bottom)),
                6 | 9 => segments.push((top, bottom)),
                7 | 8 => segments.push((left, bottom)),
                // saddle cells contribute two segments
                5 => {
                    segments.push((left, top));
                    segments.push((right, bottom));
                }
                10 => {
                    segments.push((top, left));
                    segments.push((bottom, right));
                }
                _ => unreachable!(),
            }
        }
    }

    link_segments(segments)
}

fn link_segments(segments: Vec<(Pos2, Pos2)>) -> Vec<Vec<Pos2>> {
    // All coordinates are multiples of 0.5, so doubling gives exact keys.
    fn key(p: Pos2) -> (i32, i32) {
        ((p.x * 2.0).round() as i32, (p.y * 2.0).round() as i32)
    }

    let mut by_endpoint: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (idx, &(a, b)) in segments.iter().enumerate() {
        by_endpoint.entry(key(a)).or_default().push(idx);
        by_endpoint.entry(key(b)).or_default().push(idx);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (first, mut cursor) = segments[start];
        let mut contour = vec![first, cursor];
        let mut closed = false;

        while let Some(&next) = by_endpoint
            .get(&key(cursor))
            .and_then(|linked| linked.iter().find(|&&i| !used[i]))
        {
            used[next] = true;
            let (a, b) = segments[next];
            cursor = if key(a) == key(cursor) { b } else { a };
            if key(cursor) == key(first) {
                closed = true;
                break;
            }
            contour.push(cursor);
        }

        // open chains only arise from corrupt masks; drop them
        if closed && contour.len() >= 3 {
            contours.push(contour);
        }
    }

    contours
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn shoelace_area(points: &[Pos2]) -> f32 {
        let twice: f32 = points
            .iter()
            .copied()
            .circular_tuple_windows()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum();
        (twice * 0.5).abs()
    }

    fn square_stroke() -> Vec<Pos2> {
        vec![
            pos2(2.0, 2.0),
            pos2(10.0, 2.0),
            pos2(10.0, 10.0),
            pos2(2.0, 10.0),
        ]
    }

    #[test]
    fn rasterize_fills_pixel_centers_inside_the_polygon() {
        let mask = rasterize_stroke(&square_stroke(), 16, 16);
        let filled = mask.iter().filter(|&&m| m != 0).count();
        assert_eq!(filled, 64);
        assert_eq!(mask[3 * 16 + 3], FILLED);
        assert_eq!(mask[0], 0);
    }

    #[test]
    fn rasterize_ignores_degenerate_polygons() {
        let mask = rasterize_stroke(&[pos2(1.0, 1.0), pos2(5.0, 5.0)], 8, 8);
        assert!(mask.iter().all(|&m| m == 0));
    }

    #[test]
    fn traces_a_single_closed_contour_around_a_block() {
        let mask = rasterize_stroke(&square_stroke(), 16, 16);
        let contours = trace_contours(&mask, 16, 16);
        assert_eq!(contours.len(), 1);

        let contour = &contours[0];
        assert!(contour.len() >= 3);

        // enclosed area tracks the filled pixel count within mask resolution
        let filled = mask.iter().filter(|&&m| m != 0).count() as f32;
        assert!((shoelace_area(contour) - filled).abs() <= filled * 0.05);
    }

    #[test]
    fn traces_regions_touching_the_mask_border() {
        let mut mask = vec![0u8; 6 * 6];
        for y in 0..3 {
            mask[y * 6..y * 6 + 3].fill(FILLED);
        }
        let contours = trace_contours(&mask, 6, 6);
        assert_eq!(contours.len(), 1);
        assert!(shoelace_area(&contours[0]) > 4.0);
    }

    #[test]
    fn traces_disjoint_regions_separately() {
        let mut mask = vec![0u8; 12 * 12];
        for y in 2..5 {
            mask[y * 12 + 2..y * 12 + 5].fill(FILLED);
            mask[y * 12 + 8..y * 12 + 11].fill(FILLED);
        }
        let contours = trace_contours(&mask, 12, 12);
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn smooth_stroke_requires_three_points() {
        assert_eq!(
            smooth_stroke(&[pos2(1.0, 1.0), pos2(4.0, 4.0)], vec2(8.0, 8.0)),
            None
        );
    }

    #[test]
    fn smooth_stroke_of_a_convex_loop_is_closed_and_tight() {
        // octagon centered in a 64x64 canvas
        let stroke: Vec<Pos2> = (0..8)
            .map(|i| {
                let a = std::f32::consts::TAU * i as f32 / 8.0;
                pos2(32.0 + 20.0 * a.cos(), 32.0 + 20.0 * a.sin())
            })
            .collect();
        let smoothed = smooth_stroke(&stroke, vec2(64.0, 64.0)).unwrap();
        assert!(smoothed.len() >= 3);

        let raw_area = shoelace_area(&stroke);
        assert!((shoelace_area(&smoothed) - raw_area).abs() <= raw_area * 0.1);
    }

    #[test]
    fn smooth_stroke_of_a_zero_area_loop_clears_the_selection() {
        let collinear = [pos2(2.0, 2.0), pos2(5.0, 2.0), pos2(8.0, 2.0)];
        assert_eq!(smooth_stroke(&collinear, vec2(16.0, 16.0)), Some(vec![]));
    }
}
