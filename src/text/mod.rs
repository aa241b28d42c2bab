//! Text engine: runs, measuring, wrapping and per-cell text views.

pub mod buffer;
pub mod run;
pub mod width;
pub mod wrap;

pub use buffer::{Glyph, PlacedGlyph, TextBuffer, TextBufferView, TextMeasure, TextSelection, TextStyle};
pub use run::{CellContent, Chunk, Link, TableContent, TextRun, content_from_text, parse_content};
pub use width::{char_width, grapheme_width, string_width};
pub use wrap::{VisualLine, wrap_lines};
