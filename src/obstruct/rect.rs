use crate::dom::node::BoundingRect;

// ============================================================================
// Axis-aligned rectangles
// ============================================================================

/// Normalized axis-aligned rectangle: min corner never exceeds max corner
/// regardless of construction order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Rect {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Page-coordinate rectangle for a viewport bounding rect plus the page
    /// scroll offsets.
    pub fn from_bounding(rect: &BoundingRect, scroll_x: f64, scroll_y: f64) -> Self {
        Rect::new(
            rect.x + scroll_x,
            rect.y + scroll_y,
            rect.x + rect.width + scroll_x,
            rect.y + rect.height + scroll_y,
        )
    }

    pub fn area(&self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    /// A degenerate rectangle has zero area (a line or a point).
    pub fn is_degenerate(&self) -> bool {
        self.area() == 0.0
    }

    /// Overlapping region of two rectangles, or None when they are disjoint.
    /// Touching edges yield a degenerate rectangle, not None.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x.max(other.min_x);
        let max_x = self.max_x.min(other.max_x);
        let min_y = self.min_y.max(other.min_y);
        let max_y = self.max_y.min(other.max_y);
        if max_x < min_x || max_y < min_y {
            return None;
        }
        Some(Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// True when the rectangles share positive area. Degenerate overlaps
    /// (shared edges, zero-sized boxes) never conflict.
    pub fn conflicts_with(&self, other: &Rect) -> bool {
        self.intersection(other)
            .is_some_and(|overlap| !overlap.is_degenerate())
    }
}
