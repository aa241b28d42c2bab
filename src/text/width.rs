//! Display width of text in terminal cells.
//!
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells
//! - Control characters and combining marks: 0 cells
//!
//! Widths come from `unicode-width`; grapheme clusters from
//! `unicode-segmentation`, so a ZWJ family or flag counts as one unit.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of a single character.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Width of one grapheme cluster, capped at 2 cells.
pub fn grapheme_width(grapheme: &str) -> usize {
    match grapheme.chars().next() {
        None => 0,
        Some(c) if c.is_control() => 0,
        Some(_) => UnicodeWidthStr::width(grapheme).min(2),
    }
}

/// Measure the display width of a string in terminal cells.
///
/// Newlines are ignored; this is the width of the text laid out on one line.
pub fn string_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}
