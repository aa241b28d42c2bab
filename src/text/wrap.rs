//! Wrapping styled glyphs into visual lines.
//!
//! Works on glyph indices rather than strings so the resulting lines can be
//! mapped straight back to selection offsets. Visual lines are contiguous:
//! every glyph of a logical line belongs to exactly one visual line.
//!
//! - **None**: only hard breaks split lines
//! - **Char**: breaks at any grapheme boundary
//! - **Word**: breaks between whitespace/word runs, falls back to grapheme
//!   breaks for words wider than the line. Whitespace that overflows hangs off
//!   the end of the line it ends instead of starting the next one.

use std::ops::Range;

use super::buffer::Glyph;
use crate::types::WrapMode;

/// One rendered line: a glyph range and its width in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    pub start: usize,
    pub end: usize,
    pub width: usize,
}

impl VisualLine {
    fn new(glyphs: &[Glyph], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            width: glyphs[start..end].iter().map(|g| g.width).sum(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Wrap every logical line of a buffer.
///
/// `logical` yields glyph ranges between hard breaks. A `max_width` of
/// `None` (or 0) disables soft wrapping regardless of `mode`.
pub fn wrap_lines(
    glyphs: &[Glyph],
    logical: impl Iterator<Item = Range<usize>>,
    mode: WrapMode,
    max_width: Option<usize>,
) -> Vec<VisualLine> {
    let max_width = max_width.filter(|w| *w > 0);
    let mut lines = Vec::new();

    for range in logical {
        match (mode, max_width) {
            (WrapMode::Char, Some(max)) => wrap_char(glyphs, range, max, &mut lines),
            (WrapMode::Word, Some(max)) => wrap_word(glyphs, range, max, &mut lines),
            _ => lines.push(VisualLine::new(glyphs, range.start, range.end)),
        }
    }

    lines
}

fn wrap_char(glyphs: &[Glyph], range: Range<usize>, max: usize, lines: &mut Vec<VisualLine>) {
    let mut start = range.start;
    let mut width = 0usize;

    for i in range.clone() {
        let w = glyphs[i].width;
        if width + w > max && i > start {
            lines.push(VisualLine::new(glyphs, start, i));
            start = i;
            width = 0;
        }
        width += w;
    }

    lines.push(VisualLine::new(glyphs, start, range.end));
}

fn wrap_word(glyphs: &[Glyph], range: Range<usize>, max: usize, lines: &mut Vec<VisualLine>) {
    let first = lines.len();
    let mut start = range.start;
    let mut width = 0usize;

    for seg in segments(glyphs, range.clone()) {
        let seg_width: usize = glyphs[seg.clone()].iter().map(|g| g.width).sum();

        if width + seg_width <= max {
            width += seg_width;
            continue;
        }

        if glyphs[seg.start].is_whitespace() {
            lines.push(VisualLine::new(glyphs, start, seg.end));
            start = seg.end;
            width = 0;
            continue;
        }

        if seg.start > start {
            lines.push(VisualLine::new(glyphs, start, seg.start));
            start = seg.start;
            width = 0;
        }

        if seg_width <= max {
            width = seg_width;
            continue;
        }

        // Word wider than the line: force-break by grapheme.
        for i in seg {
            let w = glyphs[i].width;
            if width + w > max && i > start {
                lines.push(VisualLine::new(glyphs, start, i));
                start = i;
                width = 0;
            }
            width += w;
        }
    }

    if start < range.end || lines.len() == first {
        lines.push(VisualLine::new(glyphs, start, range.end));
    }
}

/// Split a range into maximal runs of whitespace / non-whitespace glyphs.
fn segments(glyphs: &[Glyph], range: Range<usize>) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut seg_start = range.start;

    for i in range.clone() {
        if i > seg_start && glyphs[i].is_whitespace() != glyphs[seg_start].is_whitespace() {
            out.push(seg_start..i);
            seg_start = i;
        }
    }
    if seg_start < range.end {
        out.push(seg_start..range.end);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::buffer::TextBuffer;
    use crate::text::run::TextRun;

    fn wrap(text: &str, mode: WrapMode, width: Option<usize>) -> Vec<String> {
        let buffer = TextBuffer::from_run(&TextRun::plain(text));
        wrap_lines(buffer.glyphs(), buffer.logical_lines(), mode, width)
            .iter()
            .map(|line| buffer.text_in(line.range()))
            .collect()
    }

    #[test]
    fn wrap_empty_is_one_line() {
        assert_eq!(wrap("", WrapMode::Word, Some(5)), vec![""]);
    }

    #[test]
    fn wrap_none_keeps_hard_breaks_only() {
        assert_eq!(wrap("hello world\nx", WrapMode::None, Some(3)), vec!["hello world", "x"]);
    }

    #[test]
    fn wrap_char_breaks_anywhere() {
        assert_eq!(wrap("hello world", WrapMode::Char, Some(5)), vec!["hello", " worl", "d"]);
    }

    #[test]
    fn wrap_word_hangs_whitespace() {
        assert_eq!(wrap("hello world", WrapMode::Word, Some(5)), vec!["hello ", "world"]);
        assert_eq!(wrap("hello ", WrapMode::Word, Some(5)), vec!["hello "]);
    }

    #[test]
    fn wrap_word_packs_words() {
        assert_eq!(wrap("a bb ccc dd", WrapMode::Word, Some(6)), vec!["a bb ", "ccc dd"]);
    }

    #[test]
    fn wrap_word_force_breaks_long_words() {
        assert_eq!(wrap("abcdefgh ij", WrapMode::Word, Some(3)), vec!["abc", "def", "gh ", "ij"]);
    }

    #[test]
    fn wrap_wide_chars() {
        assert_eq!(wrap("日本語", WrapMode::Char, Some(4)), vec!["日本", "語"]);
    }

    #[test]
    fn wrap_without_width_is_unwrapped() {
        assert_eq!(wrap("hello world", WrapMode::Word, None), vec!["hello world"]);
        assert_eq!(wrap("hello world", WrapMode::Word, Some(0)), vec!["hello world"]);
    }
}
