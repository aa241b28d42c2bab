//! One grid position: its content handle, text view and local selection.

use crate::text::{CellContent, TextBuffer, TextBufferView, TextMeasure, TextSelection, TextStyle};
use crate::types::{Rgba, WrapMode};

/// Settings every cell view shares with its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSettings {
    pub wrap_mode: WrapMode,
    pub style: TextStyle,
    pub selection_bg: Option<Rgba>,
    pub selection_fg: Option<Rgba>,
}

#[derive(Debug, Clone)]
pub struct TableCell {
    content: CellContent,
    view: TextBufferView,
}

impl TableCell {
    pub fn new(content: CellContent, settings: &CellSettings) -> Self {
        let buffer = match &content {
            Some(run) => TextBuffer::from_run(run),
            None => TextBuffer::new(),
        };
        let mut cell = Self {
            content,
            view: TextBufferView::new(buffer),
        };
        cell.apply(settings);
        cell
    }

    /// The content handle this cell was built from.
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn view(&self) -> &TextBufferView {
        &self.view
    }

    /// Re-apply shared settings in place.
    pub fn apply(&mut self, settings: &CellSettings) {
        self.view.set_wrap_mode(settings.wrap_mode);
        self.view.set_style(settings.style);
        self.view.set_selection_colors(settings.selection_bg, settings.selection_fg);
    }

    /// Unwrapped width of the widest line.
    pub fn natural_width(&self) -> usize {
        self.view.measure(None, None).max_width
    }

    /// Lines needed at a content width.
    pub fn line_count(&self, width: usize) -> usize {
        self.measure(width).line_count
    }

    pub fn measure(&self, width: usize) -> TextMeasure {
        self.view.measure(Some(width.max(1)), None)
    }

    /// Size the view to the cell's content rectangle.
    pub fn set_content_size(&mut self, width: u16, height: u16) {
        self.view.set_viewport(0, 0, width, height);
    }

    pub fn set_local_selection(&mut self, anchor: (i32, i32), focus: (i32, i32), settings: &CellSettings) -> bool {
        self.view
            .set_local_selection(anchor, focus, settings.selection_bg, settings.selection_fg)
    }

    pub fn update_local_selection(&mut self, anchor: (i32, i32), focus: (i32, i32), settings: &CellSettings) -> bool {
        self.view
            .update_local_selection(anchor, focus, settings.selection_bg, settings.selection_fg)
    }

    pub fn reset_local_selection(&mut self) -> bool {
        self.view.reset_local_selection()
    }

    pub fn has_selection(&self) -> bool {
        self.view.has_selection()
    }

    pub fn selection(&self) -> Option<TextSelection> {
        self.view.selection()
    }

    pub fn selected_text(&self) -> String {
        self.view.selected_text()
    }
}
