//! Contracts consumed from the host document model.
//!
//! The overlay never owns document content. It reads selection, layout and
//! formatting through [`DocumentView`] and writes only through the explicit
//! primitives of [`DocumentModel`], always passing a [`Source`] tag.

pub mod memory;
mod upload;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

pub use memory::{MemoryDocument, Mutation};
pub use upload::{ImageUploader, UploadFile, Uploader};

/// A remembered span in document coordinates. A zero length marks a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub index: usize,
    pub length: usize,
}

impl Range {
    pub const fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    pub const fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    pub const fn is_caret(&self) -> bool {
        self.length == 0
    }

    pub const fn end(&self) -> usize {
        self.index + self.length
    }

    /// Resize in place after the underlying text was replaced.
    pub fn set_length(&mut self, length: usize) {
        self.length = length;
    }
}

/// Origin tag carried by every mutation and change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    User,
    Api,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    Video,
    Formula,
    Image,
}

impl EmbedKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Formula => "formula",
            Self::Image => "image",
        }
    }
}

/// Value passed to a formatting call. `Clear` removes the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatValue {
    Clear,
    Value(String),
}

impl FormatValue {
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Clear => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// Active formatting at a range, keyed by format name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Formats(BTreeMap<String, String>);

impl Formats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Formats {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub range: Range,
    pub url: String,
}

/// Read side of the document model.
pub trait DocumentView {
    /// Current selection, `None` when the document has no selection.
    fn selection(&self) -> Option<Range>;
    /// Last selection the document held, kept across focus loss.
    fn saved_selection(&self) -> Option<Range>;
    /// Screen-space bounds of `range`, `None` when it is not laid out.
    fn bounds(&self, range: Range) -> Option<Bounds>;
    /// Plain text inside `range`; embeds contribute nothing.
    fn text(&self, range: Range) -> String;
    fn formats(&self, range: Range) -> Formats;
    /// Link whose span covers `index`, with the span's full extent.
    fn link_at(&self, index: usize) -> Option<LinkSpan>;
    fn has_focus(&self) -> bool;
    fn scroll_top(&self) -> i32;
    /// Whether the editor root is still part of the live UI tree.
    fn is_attached(&self) -> bool;
}

/// Write side of the document model. Every primitive takes an origin tag.
pub trait DocumentModel: DocumentView {
    /// Take input focus without scrolling the viewport.
    fn focus(&mut self);
    fn set_scroll_top(&mut self, scroll_top: i32);
    fn delete_text(&mut self, index: usize, length: usize, source: Source);
    fn insert_text(&mut self, index: usize, text: &str, source: Source);
    fn format_text(&mut self, range: Range, name: &str, value: FormatValue, source: Source);
    /// Apply a format to the current selection.
    fn format(&mut self, name: &str, value: FormatValue, source: Source);
    fn insert_embed(&mut self, index: usize, kind: EmbedKind, value: &str, source: Source);
    fn set_selection(&mut self, range: Range, source: Source);

    /// Open an undo group. Hosts without grouped history ignore this.
    fn begin_group(&mut self) {}
    fn end_group(&mut self) {}
}
