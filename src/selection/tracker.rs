//! Drag-selection state machine driven by crossterm mouse events.
//!
//! `Idle -> Dragging (start) -> Dragging (updates) -> Idle`
//!
//! Only the left button selects. A press that the start predicate rejects
//! clears any existing selection. Releasing ends the drag but keeps the
//! selection visible until the next press or [`SelectionTracker::clear`].

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

use super::{Point, Selection};

/// What a mouse event did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Changed(Selection),
    Cleared,
}

impl SelectionEvent {
    /// The current selection, if the event left one.
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Changed(selection) => Some(selection),
            Self::Cleared => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionTracker {
    selection: Option<Selection>,
    dragging: bool,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed one mouse event.
    ///
    /// `can_start` is asked whether a press at a screen point may begin a
    /// selection.
    pub fn handle_mouse<F>(&mut self, event: MouseEvent, can_start: F) -> Option<SelectionEvent>
    where
        F: FnOnce(i32, i32) -> bool,
    {
        let at = Point::new(event.column as i32, event.row as i32);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if can_start(at.x, at.y) {
                    let selection = Selection::start(at);
                    trace!(x = at.x, y = at.y, "selection started");
                    self.selection = Some(selection);
                    self.dragging = true;
                    Some(SelectionEvent::Changed(selection))
                } else {
                    self.dragging = false;
                    self.selection = None;
                    Some(SelectionEvent::Cleared)
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Up(MouseButton::Left) => {
                if !self.dragging {
                    return None;
                }
                if matches!(event.kind, MouseEventKind::Up(_)) {
                    self.dragging = false;
                }

                let selection = self.selection.as_mut()?;
                selection.focus = at;
                selection.is_start = false;
                Some(SelectionEvent::Changed(*selection))
            }
            _ => None,
        }
    }

    /// Drop the selection and end any drag.
    pub fn clear(&mut self) -> SelectionEvent {
        self.selection = None;
        self.dragging = false;
        SelectionEvent::Cleared
    }
}
