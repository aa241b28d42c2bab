//! Global selection state.
//!
//! A [`Selection`] lives in screen coordinates and knows nothing about the
//! components under it. Each component translates it into its own space with
//! [`Selection::local_bounds`] and decides what that means for its content.

pub mod tracker;

pub use tracker::{SelectionEvent, SelectionTracker};

/// A point in screen or component coordinates. May be negative after
/// translation into a component's space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A drag selection in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where the drag started.
    pub anchor: Point,
    /// Where the drag currently is.
    pub focus: Point,
    /// True only for the event that starts a drag.
    pub is_start: bool,
    pub is_active: bool,
}

impl Selection {
    /// A new selection collapsed at `at`.
    pub fn start(at: Point) -> Self {
        Self {
            anchor: at,
            focus: at,
            is_start: true,
            is_active: true,
        }
    }

    /// Translate into the space of a component whose top-left is `origin`.
    pub fn local_bounds(&self, origin: Point) -> LocalSelectionBounds {
        LocalSelectionBounds {
            anchor_x: self.anchor.x - origin.x,
            anchor_y: self.anchor.y - origin.y,
            focus_x: self.focus.x - origin.x,
            focus_y: self.focus.y - origin.y,
            is_active: self.is_active,
            is_start: self.is_start,
        }
    }
}

/// A selection expressed in one component's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSelectionBounds {
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub focus_x: i32,
    pub focus_y: i32,
    pub is_active: bool,
    pub is_start: bool,
}

impl LocalSelectionBounds {
    /// Top and bottom rows covered, inclusive.
    pub fn vertical_span(&self) -> (i32, i32) {
        (self.anchor_y.min(self.focus_y), self.anchor_y.max(self.focus_y))
    }

    /// Shift both points by `(-dx, -dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            anchor_x: self.anchor_x - dx,
            anchor_y: self.anchor_y - dy,
            focus_x: self.focus_x - dx,
            focus_y: self.focus_y - dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_bounds_subtracts_origin() {
        let mut sel = Selection::start(Point::new(12, 7));
        sel.focus = Point::new(3, 9);
        sel.is_start = false;

        let local = sel.local_bounds(Point::new(10, 5));
        assert_eq!((local.anchor_x, local.anchor_y), (2, 2));
        assert_eq!((local.focus_x, local.focus_y), (-7, 4));
        assert!(!local.is_start);
        assert_eq!(local.vertical_span(), (2, 4));
    }

    #[test]
    fn test_translated_keeps_flags() {
        let local = Selection::start(Point::new(5, 5)).local_bounds(Point::default());
        let moved = local.translated(2, 3);
        assert_eq!((moved.anchor_x, moved.anchor_y), (3, 2));
        assert!(moved.is_start && moved.is_active);
    }
}
