use std::collections::BTreeMap;

use serde::Serialize;

use super::{DocumentModel, DocumentView, EmbedKind, FormatValue, Formats, LinkSpan, Range, Source};
use crate::events::EditorChange;
use crate::geometry::Bounds;

const CHAR_WIDTH_PX: i32 = 8;
const LINE_HEIGHT_PX: u32 = 18;

/// One recorded write against a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Delete {
        index: usize,
        length: usize,
        source: Source,
    },
    Insert {
        index: usize,
        text: String,
        source: Source,
    },
    Format {
        range: Range,
        name: String,
        value: FormatValue,
        source: Source,
    },
    InsertEmbed {
        index: usize,
        kind: EmbedKind,
        value: String,
        source: Source,
    },
    SetSelection {
        range: Range,
        source: Source,
    },
    GroupStart,
    GroupEnd,
}

impl Mutation {
    /// Selection moves and group markers do not change content.
    pub const fn is_content_change(&self) -> bool {
        matches!(
            self,
            Self::Delete { .. } | Self::Insert { .. } | Self::Format { .. } | Self::InsertEmbed { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Char(char),
    Embed { kind: EmbedKind, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    content: Content,
    attributes: BTreeMap<String, String>,
}

impl Item {
    fn char(ch: char) -> Self {
        Self {
            content: Content::Char(ch),
            attributes: BTreeMap::new(),
        }
    }
}

/// In-memory document model laid out on a single line of fixed-width cells.
///
/// Every write is appended to a mutation log and queues the change
/// notification the host would emit; call [`MemoryDocument::take_changes`]
/// and feed them to an [`crate::events::Emitter`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    items: Vec<Item>,
    selection: Option<Range>,
    saved_selection: Option<Range>,
    has_focus: bool,
    scroll_top: i32,
    attached: bool,
    focus_requests: usize,
    mutations: Vec<Mutation>,
    changes: Vec<EditorChange>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryDocument {
    pub fn new(text: &str) -> Self {
        Self {
            items: text.chars().map(Item::char).collect(),
            selection: None,
            saved_selection: None,
            has_focus: false,
            scroll_top: 0,
            attached: true,
            focus_requests: 0,
            mutations: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Builder for fixtures: marks `range` as a link without logging a mutation.
    pub fn with_link(mut self, range: Range, url: &str) -> Self {
        self.apply_attribute(range, "link", &FormatValue::value(url));
        self
    }

    /// Builder for fixtures: focuses the document with `range` selected.
    pub fn with_selection(mut self, range: Range) -> Self {
        let range = self.clamp(range);
        self.selection = Some(range);
        self.saved_selection = Some(range);
        self.has_focus = true;
        self
    }

    pub fn with_scroll_top(mut self, scroll_top: i32) -> Self {
        self.scroll_top = scroll_top;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Full plain text, embeds rendered as U+FFFC.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match item.content {
                Content::Char(ch) => ch,
                Content::Embed { .. } => '\u{FFFC}',
            })
            .collect()
    }

    pub fn embed_at(&self, index: usize) -> Option<(EmbedKind, &str)> {
        match &self.items.get(index)?.content {
            Content::Embed { kind, value } => Some((*kind, value.as_str())),
            Content::Char(_) => None,
        }
    }

    pub fn attribute_at(&self, index: usize, name: &str) -> Option<&str> {
        self.items
            .get(index)?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn content_mutations(&self) -> Vec<&Mutation> {
        self.mutations
            .iter()
            .filter(|mutation| mutation.is_content_change())
            .collect()
    }

    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    pub fn take_changes(&mut self) -> Vec<EditorChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests
    }

    /// Drop input focus; the saved selection is kept.
    pub fn blur(&mut self) {
        self.has_focus = false;
        let old_range = self.selection.take();
        if old_range.is_some() {
            self.changes.push(EditorChange::SelectionChange {
                range: None,
                old_range,
                source: Source::User,
            });
        }
    }

    /// Simulate the editor root being removed from the UI tree.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    fn clamp(&self, range: Range) -> Range {
        let index = range.index.min(self.items.len());
        let length = range.length.min(self.items.len() - index);
        Range::new(index, length)
    }

    fn apply_attribute(&mut self, range: Range, name: &str, value: &FormatValue) {
        let range = self.clamp(range);
        for item in &mut self.items[range.index..range.end()] {
            match value {
                FormatValue::Clear => {
                    item.attributes.remove(name);
                }
                FormatValue::Value(value) => {
                    item.attributes.insert(name.to_string(), value.clone());
                }
            }
        }
    }

    fn insert_items(&mut self, index: usize, items: Vec<Item>) {
        let index = index.min(self.items.len());
        let count = items.len();
        self.items.splice(index..index, items);
        self.shift_selection(|range| {
            if range.index >= index {
                Range::new(range.index + count, range.length)
            } else if range.end() > index {
                Range::new(range.index, range.length + count)
            } else {
                range
            }
        });
    }

    fn shift_selection(&mut self, shift: impl Fn(Range) -> Range) {
        self.selection = self.selection.map(&shift);
        self.saved_selection = self.saved_selection.map(&shift);
    }

    fn record(&mut self, mutation: Mutation) {
        let source = match &mutation {
            Mutation::Delete { source, .. }
            | Mutation::Insert { source, .. }
            | Mutation::Format { source, .. }
            | Mutation::InsertEmbed { source, .. } => Some(*source),
            Mutation::SetSelection { .. } | Mutation::GroupStart | Mutation::GroupEnd => None,
        };
        if let Some(source) = source {
            self.changes.push(EditorChange::TextChange { source });
        }
        self.mutations.push(mutation);
    }
}

impl DocumentView for MemoryDocument {
    fn selection(&self) -> Option<Range> {
        if self.has_focus {
            self.selection
        } else {
            None
        }
    }

    fn saved_selection(&self) -> Option<Range> {
        self.saved_selection
    }

    fn bounds(&self, range: Range) -> Option<Bounds> {
        if range.end() > self.items.len() {
            return None;
        }
        Some(Bounds::new(
            range.index as i32 * CHAR_WIDTH_PX,
            -self.scroll_top,
            range.length as u32 * CHAR_WIDTH_PX as u32,
            LINE_HEIGHT_PX,
        ))
    }

    fn text(&self, range: Range) -> String {
        let range = self.clamp(range);
        self.items[range.index..range.end()]
            .iter()
            .filter_map(|item| match item.content {
                Content::Char(ch) => Some(ch),
                Content::Embed { .. } => None,
            })
            .collect()
    }

    fn formats(&self, range: Range) -> Formats {
        let range = self.clamp(range);
        if range.is_caret() {
            let preceding = range.index.saturating_sub(1);
            return self
                .items
                .get(preceding)
                .map(|item| item.attributes.clone().into_iter().collect())
                .unwrap_or_default();
        }

        let mut covered = self.items[range.index..range.end()].iter();
        let Some(first) = covered.next() else {
            return Formats::default();
        };
        let mut shared = first.attributes.clone();
        for item in covered {
            shared.retain(|name, value| item.attributes.get(name) == Some(value));
        }
        shared.into_iter().collect()
    }

    fn link_at(&self, index: usize) -> Option<LinkSpan> {
        let url = self.items.get(index)?.attributes.get("link")?.clone();
        let same_link = |item: &Item| item.attributes.get("link") == Some(&url);

        let start = self.items[..index]
            .iter()
            .rposition(|item| !same_link(item))
            .map_or(0, |position| position + 1);
        let end = self.items[index..]
            .iter()
            .position(|item| !same_link(item))
            .map_or(self.items.len(), |position| index + position);

        Some(LinkSpan {
            range: Range::new(start, end - start),
            url,
        })
    }

    fn has_focus(&self) -> bool {
        self.has_focus
    }

    fn scroll_top(&self) -> i32 {
        self.scroll_top
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

impl DocumentModel for MemoryDocument {
    fn focus(&mut self) {
        self.focus_requests += 1;
        if self.has_focus {
            return;
        }
        self.has_focus = true;
        if self.selection.is_none() {
            let restored = self.saved_selection.unwrap_or_else(|| Range::caret(self.items.len()));
            self.selection = Some(restored);
            self.saved_selection = Some(restored);
        }
    }

    fn set_scroll_top(&mut self, scroll_top: i32) {
        self.scroll_top = scroll_top;
    }

    fn delete_text(&mut self, index: usize, length: usize, source: Source) {
        let range = self.clamp(Range::new(index, length));
        self.items.drain(range.index..range.end());
        self.shift_selection(|selection| {
            let start = if selection.index > range.index {
                selection.index.saturating_sub(range.length).max(range.index)
            } else {
                selection.index
            };
            let end = if selection.end() > range.index {
                selection.end().saturating_sub(range.length).max(range.index)
            } else {
                selection.end()
            };
            Range::new(start, end - start)
        });
        self.record(Mutation::Delete {
            index: range.index,
            length: range.length,
            source,
        });
    }

    fn insert_text(&mut self, index: usize, text: &str, source: Source) {
        let index = index.min(self.items.len());
        // Inserted text inherits inline formats from the preceding item, except links.
        let inherited = index
            .checked_sub(1)
            .and_then(|previous| self.items.get(previous))
            .map(|item| {
                let mut attributes = item.attributes.clone();
                attributes.remove("link");
                attributes
            })
            .unwrap_or_default();
        let items = text
            .chars()
            .map(|ch| Item {
                content: Content::Char(ch),
                attributes: inherited.clone(),
            })
            .collect();
        self.insert_items(index, items);
        self.record(Mutation::Insert {
            index,
            text: text.to_string(),
            source,
        });
    }

    fn format_text(&mut self, range: Range, name: &str, value: FormatValue, source: Source) {
        self.apply_attribute(range, name, &value);
        self.record(Mutation::Format {
            range,
            name: name.to_string(),
            value,
            source,
        });
    }

    fn format(&mut self, name: &str, value: FormatValue, source: Source) {
        let Some(range) = self.selection() else {
            return;
        };
        self.format_text(range, name, value, source);
    }

    fn insert_embed(&mut self, index: usize, kind: EmbedKind, value: &str, source: Source) {
        let index = index.min(self.items.len());
        let item = Item {
            content: Content::Embed {
                kind,
                value: value.to_string(),
            },
            attributes: BTreeMap::new(),
        };
        self.insert_items(index, vec![item]);
        self.record(Mutation::InsertEmbed {
            index,
            kind,
            value: value.to_string(),
            source,
        });
    }

    fn set_selection(&mut self, range: Range, source: Source) {
        let range = self.clamp(range);
        let old_range = self.selection();
        self.has_focus = true;
        self.selection = Some(range);
        self.saved_selection = Some(range);
        // Single-line layout: revealing the caret scrolls back to the top.
        self.scroll_top = 0;
        self.mutations.push(Mutation::SetSelection { range, source });
        self.changes.push(EditorChange::SelectionChange {
            range: Some(range),
            old_range,
            source,
        });
    }

    fn begin_group(&mut self) {
        self.mutations.push(Mutation::GroupStart);
    }

    fn end_group(&mut self) {
        self.mutations.push(Mutation::GroupEnd);
    }
}
