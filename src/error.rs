//! Error types for spark-table.
//!
//! The layout and paint paths never fail; only the edges that parse external
//! input (content JSON, option files, color strings) or drive the flex host
//! return errors.

use thiserror::Error;

/// Errors raised while loading content or options.
#[derive(Error, Debug)]
pub enum Error {
    /// The content document is not valid table JSON.
    #[error("invalid table content: {0}")]
    Content(#[from] serde_json::Error),

    /// The options document is not valid TOML for [`crate::TableOptions`].
    #[error("invalid table options: {0}")]
    Config(#[from] toml::de::Error),

    /// A color string could not be parsed.
    #[error(transparent)]
    Color(#[from] ColorParseError),

    /// The flex layout host rejected the table's node tree.
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),
}

/// Result type alias using the crate Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for color parsing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("invalid color: {0} (expected #rgb, #rrggbb, #rrggbbaa, transparent or default)")]
    Invalid(String),
}
