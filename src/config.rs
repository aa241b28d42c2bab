//! Table options.
//!
//! Every runtime-mutable property of a table, gathered in one struct that
//! can be built in code or loaded from TOML:
//!
//! ```toml
//! wrap_mode = "char"
//! column_width_mode = "fill"
//! cell_padding = 1
//! border_style = "rounded"
//! border_color = "#6272a4"
//! background_color = "#282a36"
//! attributes = 1
//! selection_bg = "#44475a"
//! ```
//!
//! Missing keys take their defaults. Negative padding falls back to 0.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Attr, BorderStyle, ColumnWidthMode, Rgba, WrapMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    pub wrap_mode: WrapMode,
    pub column_width_mode: ColumnWidthMode,
    /// Cells of padding on all four sides of every cell.
    pub cell_padding: i32,
    /// Paint border glyphs. Spacing is reserved either way.
    pub show_borders: bool,
    /// Inner separators, and the outer frame unless `outer_border` says otherwise.
    pub border: bool,
    pub outer_border: Option<bool>,
    pub border_style: BorderStyle,
    pub border_color: Rgba,
    pub border_background_color: Rgba,
    pub background_color: Rgba,
    /// Default text color for chunks without one.
    pub fg: Rgba,
    /// Default text background for chunks without one.
    pub bg: Rgba,
    #[serde(with = "attr_mask")]
    pub attributes: Attr,
    pub selection_bg: Option<Rgba>,
    pub selection_fg: Option<Rgba>,
    /// Report intrinsic size from measurement instead of clamping to the
    /// space offered.
    pub position_absolute: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            wrap_mode: WrapMode::Word,
            column_width_mode: ColumnWidthMode::Content,
            cell_padding: 0,
            show_borders: true,
            border: true,
            outer_border: None,
            border_style: BorderStyle::Single,
            border_color: Rgba::TERMINAL_DEFAULT,
            border_background_color: Rgba::TRANSPARENT,
            background_color: Rgba::TRANSPARENT,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TRANSPARENT,
            attributes: Attr::NONE,
            selection_bg: None,
            selection_fg: None,
            position_absolute: false,
        }
    }
}

impl TableOptions {
    /// Parse options from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Padding clamped to a usable cell count.
    pub fn padding(&self) -> u16 {
        sanitize_padding(self.cell_padding)
    }

    /// Whether the outer frame is drawn.
    pub fn resolved_outer_border(&self) -> bool {
        self.outer_border.unwrap_or(self.border)
    }
}

pub(crate) fn sanitize_padding(padding: i32) -> u16 {
    padding.clamp(0, u16::MAX as i32) as u16
}

mod attr_mask {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Attr;

    pub fn serialize<S: Serializer>(attrs: &Attr, serializer: S) -> Result<S::Ok, S::Error> {
        attrs.bits().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Attr, D::Error> {
        Ok(Attr::from_bits_truncate(u8::deserialize(deserializer)?))
    }
}
