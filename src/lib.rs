//! # spark-table
//!
//! Rich-text table renderable for terminal UIs.
//!
//! A table is a grid of independent text cells with borders, fitted to a
//! width constraint, painted into a cell buffer, and selectable by mouse
//! drag across cell boundaries.
//!
//! ## Architecture
//!
//! ```text
//! TableContent (Rc'd runs) → CellGrid → TableLayout → FrameBuffer
//!                                          ↑
//!                   host measure (MeasureMode / taffy)
//! Selection (screen space) → table space → per-cell local selection
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, attributes, screen cells, border styles, modes
//! - [`text`] - Rich-text runs, width, wrapping and per-cell text views
//! - [`renderer`] - Paint targets and the FrameBuffer
//! - [`selection`] - Global selection and the mouse drag tracker
//! - [`table`] - Grid reconciliation, layout, borders, selection mapping
//! - [`config`] - Table options, loadable from TOML
//!
//! ## Example
//!
//! ```
//! use spark_table::{content_from_text, ClipRect, TableOptions, TextTable};
//!
//! let content = content_from_text(&[["Name", "Size"], ["a.rs", "12K"]]);
//! let mut table = TextTable::with_content(&content, TableOptions::default());
//! table.set_bounds(ClipRect::new(0, 0, 40, 10));
//!
//! let raster = table.render();
//! assert_eq!(raster.row_text(1), "│Name│Size│");
//! ```

pub mod config;
pub mod error;
pub mod renderer;
pub mod selection;
pub mod table;
pub mod text;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::TableOptions;
pub use error::{ColorParseError, Error, Result};

pub use renderer::{FrameBuffer, GridSpec, PaintTarget};

pub use selection::{LocalSelectionBounds, Point, Selection, SelectionEvent, SelectionTracker};

pub use table::{
    BorderLayout, CellGrid, MeasureMode, MeasureResult, RowRange, TableCell, TableLayout,
    TableStats, TextTable, layout_with_taffy,
};

pub use text::{
    CellContent, Chunk, Link, TableContent, TextBuffer, TextBufferView, TextRun, TextSelection,
    content_from_text, parse_content, string_width,
};
