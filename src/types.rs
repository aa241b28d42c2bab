//! Core types for spark-table.
//!
//! Colors, attributes, screen cells and the small enums the table engine is
//! configured with. Everything here is `Copy` and compared by value.

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    /// Transparent color.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// True when the color needs blending against what is below it.
    ///
    /// Terminal default counts as opaque: the terminal paints it solid.
    #[inline]
    pub const fn is_partially_transparent(&self) -> bool {
        !self.is_terminal_default() && self.a < 255
    }

    /// Alpha blend src over dst (Porter-Duff "over" operation).
    #[inline]
    pub fn blend(src: Self, dst: Self) -> Self {
        if src.is_opaque() || src.is_terminal_default() {
            return src;
        }
        if src.is_transparent() {
            return dst;
        }

        // Terminal default below a translucent color behaves as opaque black
        let (dr, dg, db, da) = if dst.is_terminal_default() {
            (0i16, 0i16, 0i16, 255i16)
        } else {
            (dst.r, dst.g, dst.b, dst.a)
        };

        let sa = src.a as i32;
        let inv_sa = 255 - sa;
        let out_a = sa + (da as i32 * inv_sa) / 255;

        if out_a == 0 {
            return Self::TRANSPARENT;
        }

        let channel = |s: i16, d: i16| -> i16 {
            (((s as i32 * sa) + (d as i32 * da as i32 * inv_sa / 255)) / out_a).clamp(0, 255) as i16
        };

        Self {
            r: channel(src.r, dr),
            g: channel(src.g, dg),
            b: channel(src.b, db),
            a: out_a.clamp(0, 255) as i16,
        }
    }

    /// Parse hex color string (#RGB, #RRGGBB, #RRGGBBAA).
    ///
    /// ```
    /// use spark_table::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#ff0000"), Some(Rgba::rgb(255, 0, 0)));
    /// assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
    /// assert_eq!(Rgba::from_hex("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            let high = hex_digit(s[i])?;
            let low = hex_digit(s[i + 1])?;
            Some((high << 4) | low)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => Some(Self::rgb(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
            )),
            8 => Some(Self::new(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
                hex_byte(bytes, 6)?,
            )),
            _ => None,
        }
    }

    /// Parse a hex color or one of the keywords `transparent` / `default`.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        match input.to_ascii_lowercase().as_str() {
            "transparent" => return Ok(Self::TRANSPARENT),
            "default" | "inherit" => return Ok(Self::TERMINAL_DEFAULT),
            _ => {}
        }

        Self::from_hex(input).ok_or_else(|| ColorParseError::Invalid(input.to_string()))
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(&self) -> String {
        if self.is_terminal_default() {
            return "default".to_string();
        }
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for efficient storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

// =============================================================================
// Cell - The atomic unit of terminal rendering
// =============================================================================

/// A single terminal cell.
///
/// `char == 0` marks the right half of a wide grapheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint (32 for space).
    pub char: u32,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// ClipRect
// =============================================================================

/// An axis-aligned rectangle in terminal cells.
///
/// Doubles as a clip region for drawing and as the bounds a layout host
/// assigns to a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &ClipRect) -> Option<ClipRect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x.saturating_add(self.width).min(other.x.saturating_add(other.width));
        let y2 = self.y.saturating_add(self.height).min(other.y.saturating_add(other.height));

        if x2 > x1 && y2 > y1 {
            Some(ClipRect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Named border glyph sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// ─ │ ┌ ┐ └ ┘ ┬ ┴ ├ ┤ ┼
    #[default]
    Single,
    /// ─ │ ╭ ╮ ╰ ╯ ┬ ┴ ├ ┤ ┼
    Rounded,
    /// ═ ║ ╔ ╗ ╚ ╝ ╦ ╩ ╠ ╣ ╬
    Double,
    /// ━ ┃ ┏ ┓ ┗ ┛ ┳ ┻ ┣ ┫ ╋
    Heavy,
    /// - | + + + + + + + + +
    Ascii,
}

/// The eleven glyphs a grid needs: two line glyphs and nine junctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub horizontal: char,
    pub vertical: char,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub top_tee: char,
    pub bottom_tee: char,
    pub left_tee: char,
    pub right_tee: char,
    pub cross: char,
}

impl BorderGlyphs {
    /// Pick the glyph for a point given which directions its lines extend to.
    pub fn junction(&self, up: bool, down: bool, left: bool, right: bool) -> char {
        match (up, down, left, right) {
            (true, true, true, true) => self.cross,
            (false, true, true, true) => self.top_tee,
            (true, false, true, true) => self.bottom_tee,
            (true, true, false, true) => self.left_tee,
            (true, true, true, false) => self.right_tee,
            (false, true, false, true) => self.top_left,
            (false, true, true, false) => self.top_right,
            (true, false, false, true) => self.bottom_left,
            (true, false, true, false) => self.bottom_right,
            (_, _, false, false) => self.vertical,
            _ => self.horizontal,
        }
    }

    /// Every glyph in the set, for exclusion checks.
    pub fn all(&self) -> [char; 11] {
        [
            self.horizontal,
            self.vertical,
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
            self.top_tee,
            self.bottom_tee,
            self.left_tee,
            self.right_tee,
            self.cross,
        ]
    }
}

impl BorderStyle {
    /// Get the glyph set for this style.
    pub const fn glyphs(&self) -> BorderGlyphs {
        let g = match self {
            Self::Single => ['─', '│', '┌', '┐', '└', '┘', '┬', '┴', '├', '┤', '┼'],
            Self::Rounded => ['─', '│', '╭', '╮', '╰', '╯', '┬', '┴', '├', '┤', '┼'],
            Self::Double => ['═', '║', '╔', '╗', '╚', '╝', '╦', '╩', '╠', '╣', '╬'],
            Self::Heavy => ['━', '┃', '┏', '┓', '┗', '┛', '┳', '┻', '┣', '┫', '╋'],
            Self::Ascii => ['-', '|', '+', '+', '+', '+', '+', '+', '+', '+', '+'],
        };
        BorderGlyphs {
            horizontal: g[0],
            vertical: g[1],
            top_left: g[2],
            top_right: g[3],
            bottom_left: g[4],
            bottom_right: g[5],
            top_tee: g[6],
            bottom_tee: g[7],
            left_tee: g[8],
            right_tee: g[9],
            cross: g[10],
        }
    }
}

// =============================================================================
// Table Modes
// =============================================================================

/// Text wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    None,
    #[default]
    Word,
    Char,
}

impl WrapMode {
    #[inline]
    pub const fn wraps(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How columns use spare horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidthMode {
    /// Columns keep their intrinsic width; the table may be narrower than
    /// the space it is given.
    #[default]
    Content,
    /// Columns grow to fill the width constraint exactly.
    Fill,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);
        assert!(Rgba::parse("default").unwrap().is_terminal_default());
        assert_eq!(Rgba::parse(""), Err(ColorParseError::Empty));
        assert!(matches!(Rgba::parse("nope"), Err(ColorParseError::Invalid(_))));
    }

    #[test]
    fn test_hex_round_trip_via_string() {
        let color = Rgba::new(0x12, 0x34, 0x56, 0x80);
        let s: String = color.into();
        assert_eq!(s, "#12345680");
        assert_eq!(Rgba::try_from(s).unwrap(), color);
    }

    #[test]
    fn test_partial_transparency() {
        assert!(Rgba::new(0, 0, 0, 128).is_partially_transparent());
        assert!(Rgba::TRANSPARENT.is_partially_transparent());
        assert!(!Rgba::BLACK.is_partially_transparent());
        assert!(!Rgba::TERMINAL_DEFAULT.is_partially_transparent());
    }

    #[test]
    fn test_blend_half_over_white() {
        let out = Rgba::blend(Rgba::new(0, 0, 0, 128), Rgba::WHITE);
        assert_eq!(out.a, 255);
        assert!(out.r > 100 && out.r < 140);
    }

    #[test]
    fn test_junction_glyphs() {
        let g = BorderStyle::Single.glyphs();
        assert_eq!(g.junction(true, true, true, true), '┼');
        assert_eq!(g.junction(false, true, false, true), '┌');
        assert_eq!(g.junction(true, false, true, false), '┘');
        assert_eq!(g.junction(true, true, false, false), '│');
        assert_eq!(g.junction(false, false, true, true), '─');
        assert_eq!(g.junction(false, false, false, true), '─');
    }

    #[test]
    fn test_clip_rect_intersect() {
        let a = ClipRect::new(0, 0, 10, 10);
        let b = ClipRect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(ClipRect::new(5, 5, 5, 5)));
        assert_eq!(a.intersect(&ClipRect::new(20, 20, 1, 1)), None);
    }
}
