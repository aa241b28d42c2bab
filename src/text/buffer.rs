//! Text buffers and views.
//!
//! [`TextBuffer`] flattens a [`TextRun`] into styled grapheme clusters and
//! remembers where hard line breaks fall. [`TextBufferView`] layers wrapping,
//! a viewport, default styling and a local selection on top of one buffer.
//!
//! # Local selection
//!
//! A view's selection is an anchor/focus pair in the view's own coordinate
//! space (column, visual line), relative to its viewport. Points are resolved
//! to caret offsets against the current wrapping, so the same pair stays
//! meaningful after a re-wrap:
//!
//! - above the first line -> offset 0
//! - below the last line -> end of text
//! - left of a line -> line start, right of a line -> line end
//!
//! The selected range is `[min, max)` of the two carets.

use std::ops::Range;
use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;

use super::run::TextRun;
use super::width::grapheme_width;
use super::wrap::{VisualLine, wrap_lines};
use crate::types::{Attr, ClipRect, Rgba, WrapMode};

// =============================================================================
// Glyphs
// =============================================================================

/// One grapheme cluster with the styling of the chunk it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    pub width: usize,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
    pub attrs: Option<Attr>,
    pub link: Option<Rc<str>>,
}

impl Glyph {
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

// =============================================================================
// TextBuffer
// =============================================================================

/// Styled grapheme storage for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBuffer {
    glyphs: Vec<Glyph>,
    /// Glyph index where each logical line starts. Always begins with 0.
    line_starts: Vec<usize>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            glyphs: Vec::new(),
            line_starts: vec![0],
        }
    }

    pub fn from_run(run: &TextRun) -> Self {
        let mut buffer = Self::new();
        buffer.set_run(run);
        buffer
    }

    /// Replace the contents with a run.
    pub fn set_run(&mut self, run: &TextRun) {
        self.glyphs.clear();
        self.line_starts.clear();
        self.line_starts.push(0);

        for chunk in &run.chunks {
            let link: Option<Rc<str>> = chunk.link.as_ref().map(|l| Rc::from(l.url.as_str()));

            for grapheme in chunk.text.graphemes(true) {
                if grapheme == "\n" || grapheme == "\r\n" {
                    self.line_starts.push(self.glyphs.len());
                    continue;
                }

                self.glyphs.push(Glyph {
                    text: grapheme.to_string(),
                    width: grapheme_width(grapheme),
                    fg: chunk.fg,
                    bg: chunk.bg,
                    attrs: chunk.attributes,
                    link: link.clone(),
                });
            }
        }
    }

    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph ranges between hard line breaks.
    pub fn logical_lines(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let len = self.glyphs.len();
        self.line_starts.iter().enumerate().map(move |(i, &start)| {
            let end = self.line_starts.get(i + 1).copied().unwrap_or(len);
            start..end
        })
    }

    /// Text of a glyph range, with `\n` restored for hard breaks inside it.
    pub fn text_in(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.glyphs.len());
        let start = range.start.min(end);
        let mut out = String::new();
        let mut breaks = self.line_starts[1..]
            .iter()
            .copied()
            .filter(|&s| s > start)
            .peekable();

        for i in start..end {
            while let Some(&s) = breaks.peek() {
                if s > i {
                    break;
                }
                out.push('\n');
                breaks.next();
            }
            out.push_str(&self.glyphs[i].text);
        }

        out
    }

    /// All text, hard breaks included.
    pub fn plain_text(&self) -> String {
        let breaks = &self.line_starts[1..];
        if self.glyphs.is_empty() {
            return "\n".repeat(breaks.len());
        }

        // Breaks at 0 and at `len` are not inside any glyph range.
        let leading = breaks.iter().filter(|&&s| s == 0).count();
        let trailing = breaks.iter().filter(|&&s| s == self.glyphs.len()).count();
        let mut out = "\n".repeat(leading);
        out.push_str(&self.text_in(0..self.glyphs.len()));
        out.push_str(&"\n".repeat(trailing));
        out
    }
}

// =============================================================================
// TextBufferView
// =============================================================================

/// Result of measuring a view at a given width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMeasure {
    pub max_width: usize,
    pub line_count: usize,
}

/// Styling applied where a chunk does not specify its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TRANSPARENT,
            attrs: Attr::NONE,
        }
    }
}

/// A resolved selection as caret offsets into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSelection {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocalSelection {
    anchor: (i32, i32),
    focus: (i32, i32),
}

/// A glyph positioned relative to the view's top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct PlacedGlyph<'a> {
    pub x: usize,
    pub y: usize,
    pub glyph: &'a Glyph,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

/// Wrapping, viewport and selection over a [`TextBuffer`].
#[derive(Debug, Clone)]
pub struct TextBufferView {
    buffer: TextBuffer,
    wrap_mode: WrapMode,
    viewport: Option<ClipRect>,
    lines: Vec<VisualLine>,
    style: TextStyle,
    selection: Option<LocalSelection>,
    selection_bg: Option<Rgba>,
    selection_fg: Option<Rgba>,
}

impl Default for TextBufferView {
    fn default() -> Self {
        Self::new(TextBuffer::new())
    }
}

impl TextBufferView {
    pub fn new(buffer: TextBuffer) -> Self {
        let mut view = Self {
            buffer,
            wrap_mode: WrapMode::default(),
            viewport: None,
            lines: Vec::new(),
            style: TextStyle::default(),
            selection: None,
            selection_bg: None,
            selection_fg: None,
        };
        view.rewrap();
        view
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Replace the run. Any selection is dropped.
    pub fn set_run(&mut self, run: &TextRun) {
        self.buffer.set_run(run);
        self.selection = None;
        self.rewrap();
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        if self.wrap_mode != mode {
            self.wrap_mode = mode;
            self.rewrap();
        }
    }

    pub fn viewport(&self) -> Option<ClipRect> {
        self.viewport
    }

    /// Set the visible window: `x`/`y` scroll into the text, `width` is also
    /// the wrap width, `height` limits the visible lines.
    pub fn set_viewport(&mut self, x: u16, y: u16, width: u16, height: u16) {
        let viewport = Some(ClipRect::new(x, y, width, height));
        if self.viewport != viewport {
            let rewrap = self.viewport.map(|v| v.width) != Some(width);
            self.viewport = viewport;
            if rewrap {
                self.rewrap();
            }
        }
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub fn set_selection_colors(&mut self, bg: Option<Rgba>, fg: Option<Rgba>) {
        self.selection_bg = bg;
        self.selection_fg = fg;
    }

    /// Visual lines at the current wrap width.
    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    fn wrap_width(&self) -> Option<usize> {
        self.viewport.map(|v| v.width as usize)
    }

    fn rewrap(&mut self) {
        self.lines = wrap_lines(
            self.buffer.glyphs(),
            self.buffer.logical_lines(),
            self.wrap_mode,
            self.wrap_width(),
        );
    }

    /// Measure at a width without touching the viewport.
    ///
    /// `width: None` measures unwrapped. `height` caps the reported line count.
    pub fn measure(&self, width: Option<usize>, height: Option<usize>) -> TextMeasure {
        if self.buffer.is_empty() {
            return TextMeasure::default();
        }

        let lines = wrap_lines(
            self.buffer.glyphs(),
            self.buffer.logical_lines(),
            self.wrap_mode,
            width,
        );
        let mut max_width = lines.iter().map(|l| l.width).max().unwrap_or(0);
        if let (true, Some(w)) = (self.wrap_mode.wraps(), width.filter(|w| *w > 0)) {
            max_width = max_width.min(w);
        }
        let line_count = match height {
            Some(h) => lines.len().min(h),
            None => lines.len(),
        };

        TextMeasure {
            max_width,
            line_count,
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Map a local point to a caret offset.
    pub fn position_to_offset(&self, x: i32, y: i32) -> usize {
        let (scroll_x, scroll_y) = self
            .viewport
            .map(|v| (v.x as i32, v.y as i32))
            .unwrap_or((0, 0));
        let (x, y) = (x + scroll_x, y + scroll_y);

        if y < 0 {
            return 0;
        }
        let Some(line) = self.lines.get(y as usize) else {
            return self.buffer.len();
        };
        if x < 0 {
            return line.start;
        }

        let mut col = 0usize;
        for i in line.range() {
            let w = self.buffer.glyphs()[i].width;
            if (x as usize) < col + w {
                return i;
            }
            col += w;
        }
        line.end
    }

    fn resolve(&self, selection: &LocalSelection) -> Option<TextSelection> {
        let a = self.position_to_offset(selection.anchor.0, selection.anchor.1);
        let b = self.position_to_offset(selection.focus.0, selection.focus.1);
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        (start < end).then_some(TextSelection { start, end })
    }

    /// Start a fresh selection. Returns whether the selected range changed.
    pub fn set_local_selection(
        &mut self,
        anchor: (i32, i32),
        focus: (i32, i32),
        bg: Option<Rgba>,
        fg: Option<Rgba>,
    ) -> bool {
        let before = self.selection();
        self.selection = Some(LocalSelection { anchor, focus });
        self.set_selection_colors(bg, fg);
        before != self.selection()
    }

    /// Move an ongoing selection, starting one if none exists. Colors are only
    /// replaced when given. Returns whether the selected range changed.
    pub fn update_local_selection(
        &mut self,
        anchor: (i32, i32),
        focus: (i32, i32),
        bg: Option<Rgba>,
        fg: Option<Rgba>,
    ) -> bool {
        if self.selection.is_none() {
            return self.set_local_selection(anchor, focus, bg, fg);
        }

        let before = self.selection();
        self.selection = Some(LocalSelection { anchor, focus });
        if bg.is_some() {
            self.selection_bg = bg;
        }
        if fg.is_some() {
            self.selection_fg = fg;
        }
        before != self.selection()
    }

    /// Drop the selection. Returns whether anything was selected.
    pub fn reset_local_selection(&mut self) -> bool {
        let had = self.has_selection();
        self.selection = None;
        had
    }

    pub fn selection(&self) -> Option<TextSelection> {
        self.selection.as_ref().and_then(|s| self.resolve(s))
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn selected_text(&self) -> String {
        match self.selection() {
            Some(sel) => self.buffer.text_in(sel.start..sel.end),
            None => String::new(),
        }
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Glyphs inside the viewport with their resolved colors.
    pub fn visible_glyphs(&self) -> Vec<PlacedGlyph<'_>> {
        let (scroll_x, scroll_y, width, height) = match self.viewport {
            Some(v) => (v.x as usize, v.y as usize, v.width as usize, v.height as usize),
            None => (0, 0, usize::MAX, usize::MAX),
        };
        let selection = self.selection();
        let glyphs = self.buffer.glyphs();
        let mut out = Vec::new();

        for (row, line) in self.lines.iter().skip(scroll_y).take(height).enumerate() {
            let mut col = 0usize;
            for i in line.range() {
                let glyph = &glyphs[i];
                let start = col;
                col += glyph.width;

                if glyph.width == 0 || start < scroll_x {
                    continue;
                }
                let x = start - scroll_x;
                if x + glyph.width > width {
                    break;
                }

                let selected = selection.is_some_and(|s| i >= s.start && i < s.end);
                let (fg, bg, attrs) = self.resolve_style(glyph, selected);
                out.push(PlacedGlyph {
                    x,
                    y: row,
                    glyph,
                    fg,
                    bg,
                    attrs,
                });
            }
        }

        out
    }

    fn resolve_style(&self, glyph: &Glyph, selected: bool) -> (Rgba, Rgba, Attr) {
        let fg = glyph.fg.unwrap_or(self.style.fg);
        let bg = glyph.bg.unwrap_or(self.style.bg);
        let attrs = glyph.attrs.unwrap_or(self.style.attrs);

        if !selected {
            return (fg, bg, attrs);
        }
        match (self.selection_bg, self.selection_fg) {
            (None, None) => (fg, bg, attrs | Attr::INVERSE),
            (sel_bg, sel_fg) => (sel_fg.unwrap_or(fg), sel_bg.unwrap_or(bg), attrs),
        }
    }
}
