//! Rich-text runs and table content.
//!
//! A run is an ordered list of chunks; each chunk is text plus optional
//! colors, attributes and a hyperlink. Table content is rows of optional runs
//! held behind `Rc` so the table can tell "same content" from "new content"
//! by pointer identity instead of comparing text.
//!
//! # Wire format
//!
//! ```json
//! [
//!   [[{"text": "Name", "attributes": 1}], [{"text": "Size"}]],
//!   [[{"text": "a.rs", "fg": "#50fa7b"}], null]
//! ]
//! ```

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Attr, Rgba};

/// A hyperlink target attached to a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// One styled piece of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Rgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Rgba>,
    #[serde(default, with = "attr_bits", skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl Chunk {
    /// An unstyled chunk.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_fg(mut self, fg: Rgba) -> Self {
        self.fg = Some(fg);
        self
    }

    pub fn with_bg(mut self, bg: Rgba) -> Self {
        self.bg = Some(bg);
        self
    }

    pub fn with_attributes(mut self, attrs: Attr) -> Self {
        self.attributes = Some(attrs);
        self
    }

    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        self.link = Some(Link { url: url.into() });
        self
    }
}

/// An ordered sequence of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextRun {
    pub chunks: Vec<Chunk>,
}

impl TextRun {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// A run holding a single unstyled chunk.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Chunk::plain(text)])
    }

    /// The run's text with styling dropped.
    pub fn plain_text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|c| c.text.is_empty())
    }
}

impl From<&str> for TextRun {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// Content of one grid position. `None` renders as an empty cell.
pub type CellContent = Option<Rc<TextRun>>;

/// Rows of cells. Rows may have different lengths.
pub type TableContent = Vec<Vec<CellContent>>;

/// Parse table content from its JSON wire form.
pub fn parse_content(json: &str) -> Result<TableContent> {
    let rows: Vec<Vec<Option<TextRun>>> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(|cell| cell.map(Rc::new)).collect())
        .collect())
}

/// Build plain-text content from string rows.
///
/// ```
/// let content = spark_table::content_from_text(&[["A", "B"], ["1", "2"]]);
/// assert_eq!(content.len(), 2);
/// ```
pub fn content_from_text<R, S>(rows: &[R]) -> TableContent
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    rows.iter()
        .map(|row| {
            row.as_ref()
                .iter()
                .map(|text| Some(Rc::new(TextRun::plain(text.as_ref()))))
                .collect()
        })
        .collect()
}

/// Attributes travel as a plain integer bitmask on the wire.
mod attr_bits {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Attr;

    pub fn serialize<S: Serializer>(attrs: &Option<Attr>, serializer: S) -> Result<S::Ok, S::Error> {
        attrs.map(|a| a.bits()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Attr>, D::Error> {
        Ok(Option::<u8>::deserialize(deserializer)?.map(Attr::from_bits_truncate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_content_with_styles_and_nulls() {
        let json = r##"[
            [[{"text": "Na", "attributes": 1}, {"text": "me", "fg": "#ff0000"}], null],
            [[{"text": "x", "link": {"url": "https://example.com"}}]]
        ]"##;
        let content = parse_content(json).unwrap();

        assert_eq!(content.len(), 2);
        assert_eq!(content[0].len(), 2);
        assert_eq!(content[1].len(), 1);
        assert!(content[0][1].is_none());

        let run = content[0][0].as_ref().unwrap();
        assert_eq!(run.plain_text(), "Name");
        assert_eq!(run.chunks[0].attributes, Some(Attr::BOLD));
        assert_eq!(run.chunks[1].fg, Some(Rgba::RED));

        let linked = content[1][0].as_ref().unwrap();
        assert_eq!(
            linked.chunks[0].link.as_ref().map(|l| l.url.as_str()),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_parse_content_rejects_bad_color() {
        let err = parse_content(r#"[[[{"text": "a", "fg": "blurple"}]]]"#).unwrap_err();
        assert!(matches!(err, Error::Content(_)));
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&TextRun::plain("hi")).unwrap();
        assert_eq!(json, r#"[{"text":"hi"}]"#);
    }

    #[test]
    fn test_content_from_text_gives_distinct_handles() {
        let content = content_from_text(&[["a", "a"]]);
        let (a, b) = (content[0][0].as_ref().unwrap(), content[0][1].as_ref().unwrap());
        assert_eq!(a, b);
        assert!(!Rc::ptr_eq(a, b));
    }
}
