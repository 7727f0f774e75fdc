use egui::{vec2, Pos2, Rect};

/// Width of the grab band around each rectangle edge, in canvas pixels.
pub const EDGE_BAND: f32 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Lasso,
    Square,
}

/// Rectangle selection in display-canvas coordinates.
///
/// Extents stay signed while dragging so the rectangle can grow in any
/// direction from its anchor point; [`SelectionRect::normalized`] folds
/// negative extents back into the origin before the rectangle is used
/// for cropping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionRect {
    pub start: Pos2,
    pub width: f32,
    pub height: f32,
}

impl SelectionRect {
    pub fn normalized(&self) -> Rect {
        Rect::from_two_pos(self.start, self.start + vec2(self.width, self.height))
    }

    /// Whether a point lies in the grab band of any of the four edges.
    ///
    /// Bands extend along the full edge lines, matching the loose hit test
    /// users expect from a small canvas: a grab near a corner matches two
    /// bands at once, which is fine because resizing applies the pointer
    /// delta to both extents anyway.
    fn on_edge(&self, p: Pos2) -> bool {
        let on_left = (p.x - self.start.x).abs() <= EDGE_BAND;
        let on_right = (p.x - (self.start.x + self.width)).abs() <= EDGE_BAND;
        let on_top = (p.y - self.start.y).abs() <= EDGE_BAND;
        let on_bottom = (p.y - (self.start.y + self.height)).abs() <= EDGE_BAND;
        on_left || on_right || on_top || on_bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Drawing,
    Resizing { anchor: Pos2 },
    Committed,
}

/// Selection state machine for the canvas.
///
/// Owns the active tool and the in-progress geometry, mutated only
/// through the pointer transition methods. Holds no reference to any UI
/// type; the widget feeds it canvas-local pointer positions and reads the
/// geometry back for painting and export.
pub struct SelectionState {
    tool: Tool,
    phase: Phase,
    stroke: Vec<Pos2>,
    rect: Option<SelectionRect>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(Tool::default())
    }
}

impl SelectionState {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            phase: Phase::Idle,
            stroke: Vec::new(),
            rect: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn stroke(&self) -> &[Pos2] {
        &self.stroke
    }

    pub fn rect(&self) -> Option<SelectionRect> {
        self.rect
    }

    /// Whether the dim overlay should cover the canvas this frame.
    pub fn overlay_dimmed(&self) -> bool {
        self.tool == Tool::Square
            && matches!(self.phase, Phase::Drawing | Phase::Resizing { .. })
    }

    /// Switch the active tool, discarding the previous tool's geometry.
    pub fn select_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        match self.tool {
            Tool::Lasso => self.stroke.clear(),
            Tool::Square => self.rect = None,
        }
        self.tool = tool;
        self.phase = Phase::Idle;
    }

    pub fn pointer_down(&mut self, pos: Pos2) {
        match self.tool {
            Tool::Square => {
                if self.rect.is_some_and(|r| r.on_edge(pos)) {
                    self.phase = Phase::Resizing { anchor: pos };
                } else {
                    self.rect = Some(SelectionRect {
                        start: pos,
                        width: 0.0,
                        height: 0.0,
                    });
                    self.phase = Phase::Drawing;
                }
            }
            Tool::Lasso => {
                self.stroke.clear();
                self.stroke.push(pos);
                self.phase = Phase::Drawing;
            }
        }
    }

    pub fn pointer_moved(&mut self, pos: Pos2) {
        match (self.tool, self.phase) {
            (Tool::Lasso, Phase::Drawing) => self.stroke.push(pos),
            (Tool::Square, Phase::Drawing) => {
                if let Some(rect) = &mut self.rect {
                    rect.width = pos.x - rect.start.x;
                    rect.height = pos.y - rect.start.y;
                }
            }
            (Tool::Square, Phase::Resizing { anchor }) => {
                if let Some(rect) = &mut self.rect {
                    rect.width += pos.x - anchor.x;
                    rect.height += pos.y - anchor.y;
                }
                self.phase = Phase::Resizing { anchor: pos };
            }
            _ => {}
        }
    }

    /// Finish the current interaction.
    ///
    /// Returns true when a lasso stroke was just completed, in which case
    /// the caller should run the contour extractor over [`Self::stroke`]
    /// and store the result via [`Self::replace_stroke`].
    pub fn pointer_up(&mut self) -> bool {
        let finished_stroke = self.tool == Tool::Lasso && self.phase == Phase::Drawing;
        if self.phase != Phase::Idle {
            self.phase = Phase::Committed;
        }
        finished_stroke
    }

    pub fn replace_stroke(&mut self, points: Vec<Pos2>) {
        self.stroke = points;
    }

    /// Drop all selection geometry, e.g. after a completed export.
    pub fn clear(&mut self) {
        self.stroke.clear();
        self.rect = None;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn committed_rect() -> SelectionState {
        let mut s = SelectionState::new(Tool::Square);
        s.pointer_down(pos2(10.0, 10.0));
        s.pointer_moved(pos2(110.0, 60.0));
        s.pointer_up();
        s
    }

    #[test]
    fn drag_defines_rectangle_extents() {
        let s = committed_rect();
        let r = s.rect().unwrap();
        assert_eq!(r.start, pos2(10.0, 10.0));
        assert_eq!((r.width, r.height), (100.0, 50.0));
    }

    #[test]
    fn backwards_drag_keeps_signed_extents() {
        let mut s = SelectionState::new(Tool::Square);
        s.pointer_down(pos2(110.0, 60.0));
        s.pointer_moved(pos2(10.0, 10.0));
        s.pointer_up();

        let r = s.rect().unwrap();
        assert_eq!((r.width, r.height), (-100.0, -50.0));
        let n = r.normalized();
        assert_eq!(n.min, pos2(10.0, 10.0));
        assert_eq!((n.width(), n.height()), (100.0, 50.0));
    }

    #[test]
    fn right_edge_drag_resizes_width_only() {
        let mut s = committed_rect();
        // 2 px off the right edge (x = 110), well within the band
        s.pointer_down(pos2(112.0, 30.0));
        s.pointer_moved(pos2(132.0, 30.0));
        s.pointer_up();

        let r = s.rect().unwrap();
        assert_eq!(r.start, pos2(10.0, 10.0));
        assert_eq!((r.width, r.height), (120.0, 50.0));
    }

    #[test]
    fn corner_drag_resizes_both_extents() {
        let mut s = committed_rect();
        s.pointer_down(pos2(110.0, 60.0));
        s.pointer_moved(pos2(120.0, 75.0));
        s.pointer_up();

        let r = s.rect().unwrap();
        assert_eq!(r.start, pos2(10.0, 10.0));
        assert_eq!((r.width, r.height), (110.0, 65.0));
    }

    #[test]
    fn down_away_from_edges_starts_a_new_rectangle() {
        let mut s = committed_rect();
        s.pointer_down(pos2(60.0, 35.0));
        let r = s.rect().unwrap();
        assert_eq!(r.start, pos2(60.0, 35.0));
        assert_eq!((r.width, r.height), (0.0, 0.0));
    }

    #[test]
    fn lasso_down_restarts_the_stroke() {
        let mut s = SelectionState::new(Tool::Lasso);
        s.pointer_down(pos2(1.0, 1.0));
        s.pointer_moved(pos2(2.0, 2.0));
        s.pointer_moved(pos2(3.0, 1.0));
        assert!(s.pointer_up());
        assert_eq!(s.stroke().len(), 3);

        s.pointer_down(pos2(5.0, 5.0));
        assert_eq!(s.stroke(), &[pos2(5.0, 5.0)]);
    }

    #[test]
    fn pointer_up_without_stroke_does_not_request_smoothing() {
        let mut s = SelectionState::new(Tool::Lasso);
        assert!(!s.pointer_up());
        s.pointer_down(pos2(1.0, 1.0));
        assert!(s.pointer_up());
        assert!(!s.pointer_up());
    }

    #[test]
    fn tool_switch_discards_previous_geometry() {
        let mut s = committed_rect();
        s.select_tool(Tool::Lasso);
        assert_eq!(s.rect(), None);

        s.pointer_down(pos2(1.0, 1.0));
        s.pointer_moved(pos2(9.0, 9.0));
        s.select_tool(Tool::Square);
        assert!(s.stroke().is_empty());
    }

    #[test]
    fn dim_overlay_tracks_square_interaction() {
        let mut s = SelectionState::new(Tool::Square);
        assert!(!s.overlay_dimmed());
        s.pointer_down(pos2(10.0, 10.0));
        assert!(s.overlay_dimmed());
        s.pointer_moved(pos2(40.0, 40.0));
        assert!(s.overlay_dimmed());
        s.pointer_up();
        assert!(!s.overlay_dimmed());

        // edge grab dims again while resizing
        s.pointer_down(pos2(40.0, 41.0));
        assert!(s.overlay_dimmed());
        s.pointer_up();
        assert!(!s.overlay_dimmed());
    }
}
