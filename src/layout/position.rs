//! Anchored placement with viewport clamping.
//!
//! An overlay (tooltip bubble, dropdown menu) is first placed on the
//! requested side of its anchor, then clamped so the whole box stays at
//! least [`VIEWPORT_MARGIN`] units from every viewport edge. Clamping wins
//! over placement: an overlay wider than the viewport pins to the left
//! margin.

use crate::types::{Point, Rect, Size};

/// Minimum distance kept between an overlay and the viewport edges.
pub const VIEWPORT_MARGIN: i32 = 8;

/// Gap between the anchor and the overlay before clamping.
const ANCHOR_GAP: i32 = 4;

/// Side of the anchor an overlay prefers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    Start,
    End,
}

impl Placement {
    /// Parse the `data-fz-placement` spellings. Unknown values are `None`
    /// so callers can fall back to their own default.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "start" | "left" => Some(Self::Start),
            "end" | "right" => Some(Self::End),
            _ => None,
        }
    }
}

/// Clamp `preferred` so a box of `size` stays `margin` units inside the
/// viewport on every side.
///
/// `min` is applied after `max`, so when the box cannot fit at all the
/// near-edge margin wins.
pub fn clamp_to_viewport(preferred: Point, size: Size, viewport: Size, margin: i32) -> Point {
    Point {
        x: preferred.x.min(viewport.width - size.width - margin).max(margin),
        y: preferred.y.min(viewport.height - size.height - margin).max(margin),
    }
}

/// Compute the clamped position of an overlay of `size` against `anchor`.
pub fn place(anchor: Rect, size: Size, placement: Placement, viewport: Size) -> Point {
    let centered_x = anchor.x + (anchor.width - size.width) / 2;
    let centered_y = anchor.y + (anchor.height - size.height) / 2;
    let preferred = match placement {
        Placement::Top => Point {
            x: centered_x,
            y: anchor.y - size.height - ANCHOR_GAP,
        },
        Placement::Bottom => Point {
            x: centered_x,
            y: anchor.bottom() + ANCHOR_GAP,
        },
        Placement::Start => Point {
            x: anchor.x - size.width - ANCHOR_GAP,
            y: centered_y,
        },
        Placement::End => Point {
            x: anchor.right() + ANCHOR_GAP,
            y: centered_y,
        },
    };
    clamp_to_viewport(preferred, size, viewport, VIEWPORT_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Size {
        Size {
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn test_overflow_right_clamps_to_margin() {
        let preferred = Point { x: 790, y: 100 };
        let size = Size {
            width: 120,
            height: 40,
        };
        let clamped = clamp_to_viewport(preferred, size, viewport(), VIEWPORT_MARGIN);
        assert_eq!(clamped.x, 800 - 120 - VIEWPORT_MARGIN);
        assert_eq!(clamped.y, 100);
    }

    #[test]
    fn test_overflow_top_left_pins_to_margin() {
        let preferred = Point { x: -50, y: -10 };
        let size = Size {
            width: 100,
            height: 30,
        };
        let clamped = clamp_to_viewport(preferred, size, viewport(), VIEWPORT_MARGIN);
        assert_eq!(clamped, Point { x: 8, y: 8 });
    }

    #[test]
    fn test_place_bottom_leaves_gap() {
        let anchor = Rect {
            x: 100,
            y: 100,
            width: 80,
            height: 20,
        };
        let size = Size {
            width: 80,
            height: 40,
        };
        let point = place(anchor, size, Placement::Bottom, viewport());
        assert_eq!(point, Point { x: 100, y: 124 });
    }

    #[test]
    fn test_place_top_flush_against_edge_clamps_down() {
        let anchor = Rect {
            x: 100,
            y: 10,
            width: 80,
            height: 20,
        };
        let size = Size {
            width: 60,
            height: 40,
        };
        // Preferred y would be negative; clamp keeps it at the margin.
        let point = place(anchor, size, Placement::Top, viewport());
        assert_eq!(point.y, VIEWPORT_MARGIN);
    }

    #[test]
    fn test_placement_parse() {
        assert_eq!(Placement::parse("top"), Some(Placement::Top));
        assert_eq!(Placement::parse("left"), Some(Placement::Start));
        assert_eq!(Placement::parse("diagonal"), None);
    }
}
