use serde::Serialize;

use crate::config::TooltipConfig;
use crate::document::{DocumentModel, DocumentView, EmbedKind, FormatValue, Range, Source};
use crate::geometry::Bounds;

use super::deferred::{DeferredQueue, SessionId};
use super::embed::{normalize_embed_url, with_default_scheme};
use super::field::{InputField, PlaceholderTemplates, TooltipField};
use super::state::{TooltipEvent, TooltipMachine, TooltipPhase, TooltipResult};
use super::{TooltipMode, LINK_FORMAT};

/// Where the content being edited comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditOrigin {
    /// New content; the preview text seeds the label field.
    Create,
    /// Existing content; the label comes from the document at the tracked range.
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Link mode needs both a URL and a label.
    MissingLinkField,
    EmptyValue,
    NoSelection,
    NoMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    LinkApplied {
        range: Range,
        url: String,
    },
    EmbedInserted {
        kind: EmbedKind,
        index: usize,
        value: String,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TooltipPlacement {
    /// Offset from the bounds container, in document coordinates.
    pub left: i32,
    pub top: i32,
    pub flipped: bool,
}

/// Snapshot of the tooltip for rendering and assertions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TooltipState {
    pub visible: bool,
    pub mode: Option<TooltipMode>,
    pub editing: bool,
    pub active_range: Option<Range>,
    pub preview_text: Option<String>,
}

/// Edit/save/cancel state machine behind the tooltip.
#[derive(Debug)]
pub struct TooltipController {
    machine: TooltipMachine,
    mode: Option<TooltipMode>,
    label: InputField,
    value: InputField,
    link_range: Option<Range>,
    label_placeholders: PlaceholderTemplates,
    value_placeholders: PlaceholderTemplates,
    width: u32,
    height: u32,
    container: Option<Bounds>,
    placement: Option<TooltipPlacement>,
    region: Option<Bounds>,
    focus: Option<TooltipField>,
    session: SessionId,
    deferred: DeferredQueue<TooltipField>,
}

impl Default for TooltipController {
    fn default() -> Self {
        Self::new(&TooltipConfig::default())
    }
}

impl TooltipController {
    pub fn new(config: &TooltipConfig) -> Self {
        Self {
            machine: TooltipMachine::new(),
            mode: None,
            label: InputField::default(),
            value: InputField::default(),
            link_range: None,
            label_placeholders: config.resolved_label_placeholders(),
            value_placeholders: config.resolved_value_placeholders(),
            width: config.width,
            height: config.height,
            container: config.bounds,
            placement: None,
            region: None,
            focus: None,
            session: SessionId::default(),
            deferred: DeferredQueue::default(),
        }
    }

    pub fn phase(&self) -> TooltipPhase {
        self.machine.phase()
    }

    pub fn is_visible(&self) -> bool {
        self.phase() != TooltipPhase::Hidden
    }

    pub fn is_editing(&self) -> bool {
        self.phase() == TooltipPhase::Editing
    }

    pub fn mode(&self) -> Option<TooltipMode> {
        self.mode
    }

    pub(crate) fn clear_mode(&mut self) {
        self.mode = None;
    }

    pub fn state(&self) -> TooltipState {
        let tracks_link = match self.phase() {
            TooltipPhase::Hidden => false,
            TooltipPhase::Previewing => true,
            TooltipPhase::Editing => self.mode == Some(TooltipMode::Link),
        };
        TooltipState {
            visible: self.is_visible(),
            mode: self.mode,
            editing: self.is_editing(),
            active_range: self.link_range.filter(|_| tracks_link),
            preview_text: None,
        }
    }

    pub fn label(&self) -> &InputField {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut InputField {
        &mut self.label
    }

    pub fn value(&self) -> &InputField {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut InputField {
        &mut self.value
    }

    pub fn link_range(&self) -> Option<Range> {
        self.link_range
    }

    pub fn set_link_range(&mut self, range: Option<Range>) {
        self.link_range = range;
    }

    pub fn focused_field(&self) -> Option<TooltipField> {
        self.focus
    }

    /// Move keyboard focus into a field immediately, superseding any pending focus step.
    pub fn focus_field(&mut self, field: TooltipField) {
        self.deferred.cancel(self.session);
        self.focus = Some(field);
    }

    pub fn placement(&self) -> Option<TooltipPlacement> {
        self.placement.filter(|_| self.is_visible())
    }

    /// Screen-space area covered by the tooltip while visible.
    pub fn region(&self) -> Option<Bounds> {
        self.region.filter(|_| self.is_visible())
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Open the tooltip for editing content of `mode`.
    ///
    /// Fields are seeded from `preview`: on [`EditOrigin::Create`] it becomes the label and the
    /// value starts empty, otherwise the label is read back from the document and `preview`
    /// becomes the value. Focus moves into a field on the next [`Self::run_deferred`].
    pub fn edit(
        &mut self,
        mode: TooltipMode,
        preview: Option<&str>,
        origin: EditOrigin,
        doc: &dyn DocumentView,
    ) {
        self.advance(TooltipEvent::Edit);
        self.deferred.cancel(self.session);
        self.session = self.session.next();
        if origin == EditOrigin::Create {
            // New content goes to the saved selection, never over a previewed link.
            self.link_range = None;
        }

        if let Some(preview) = preview {
            match origin {
                EditOrigin::Create => {
                    self.label.set_value(preview);
                    self.value.clear();
                }
                EditOrigin::Other => {
                    let tracked = self
                        .link_range
                        .or_else(|| doc.saved_selection())
                        .unwrap_or_default();
                    self.label.set_value(doc.text(tracked));
                    self.value.set_value(preview);
                }
            }
        } else if self.mode != Some(mode) {
            self.value.clear();
        }

        let saved = doc.saved_selection().unwrap_or_default();
        if let Some(bounds) = doc.bounds(saved) {
            self.position(bounds, doc.scroll_top());
        }

        self.label
            .set_placeholder(self.label_placeholders.for_mode(mode));
        self.value.select_all();
        self.value
            .set_placeholder(self.value_placeholders.for_mode(mode));
        self.mode = Some(mode);

        let target = if saved.is_caret() {
            TooltipField::Label
        } else {
            TooltipField::Value
        };
        self.deferred.schedule(self.session, target);
        tracing::debug!(?mode, ?origin, session = ?self.session, ?target, "tooltip edit");
    }

    /// Run work deferred by [`Self::edit`]. Call once the host committed layout.
    pub fn run_deferred(&mut self) -> Option<TooltipField> {
        let tasks = self.deferred.drain_current(self.session);
        if !self.is_editing() {
            return None;
        }
        let field = tasks.into_iter().last()?;
        self.focus = Some(field);
        Some(field)
    }

    /// Commit the tooltip contents to the document, then hide and refocus the document.
    ///
    /// Fails only when the tooltip is not open.
    pub fn save(&mut self, doc: &mut dyn DocumentModel) -> TooltipResult<SaveOutcome> {
        self.machine.transition(TooltipEvent::Save)?;

        let outcome = match self.mode {
            Some(TooltipMode::Link) => self.save_link(doc),
            Some(TooltipMode::Video) => {
                let url = normalize_embed_url(self.value.value());
                insert_embed(doc, EmbedKind::Video, &url)
            }
            Some(TooltipMode::Formula) => {
                let formula = self.value.value().to_string();
                insert_embed(doc, EmbedKind::Formula, &formula)
            }
            None => SaveOutcome::Skipped(SkipReason::NoMode),
        };

        self.value.clear();
        self.link_range = None;
        self.conceal();
        self.restore_focus(doc);
        tracing::debug!(?outcome, "tooltip save finished");
        Ok(outcome)
    }

    /// Hide without touching the document and give focus back to it.
    pub fn cancel(&mut self, doc: &mut dyn DocumentModel) -> TooltipResult<()> {
        self.machine.transition(TooltipEvent::Cancel)?;
        self.link_range = None;
        self.conceal();
        self.restore_focus(doc);
        Ok(())
    }

    /// Make the tooltip visible without entering edit mode.
    pub fn show(&mut self) {
        self.advance(TooltipEvent::Show);
        self.deferred.cancel(self.session);
        self.focus = None;
    }

    /// Hide the tooltip and forget the tracked link span.
    pub fn hide(&mut self) {
        self.advance(TooltipEvent::Hide);
        self.link_range = None;
        self.conceal();
    }

    pub fn restore_focus(&mut self, doc: &mut dyn DocumentModel) {
        self.focus = None;
        doc.focus();
    }

    /// Centre the tooltip under `reference`, keeping it inside the bounds container.
    ///
    /// Returns the horizontal shift applied to stay inside the container.
    pub fn position(&mut self, reference: Bounds, scroll_top: i32) -> i32 {
        let width = self.width as i32;
        let height = self.height as i32;
        let mut left = reference.left() + reference.width as i32 / 2 - width / 2;
        let mut top = reference.bottom() + scroll_top;
        let mut client_top = reference.bottom();
        let mut shift = 0;
        let mut flipped = false;

        if let Some(container) = self.container {
            if left + width > container.right() {
                shift = container.right() - (left + width);
                left += shift;
            }
            if left < container.left() {
                shift = container.left() - left;
                left += shift;
            }
            if client_top + height > container.bottom() {
                let vertical_shift = reference.height as i32 + height;
                top -= vertical_shift;
                client_top -= vertical_shift;
                flipped = true;
            }
        }

        self.placement = Some(TooltipPlacement { left, top, flipped });
        self.region = Some(Bounds::new(left, client_top, self.width, self.height));
        shift
    }

    fn save_link(&mut self, doc: &mut dyn DocumentModel) -> SaveOutcome {
        let scroll_top = doc.scroll_top();
        let text = self.label.value().to_string();
        if self.value.value().is_empty() || text.is_empty() {
            return SaveOutcome::Skipped(SkipReason::MissingLinkField);
        }
        let url = with_default_scheme(self.value.value());

        let mut range = self
            .link_range
            .take()
            .or_else(|| doc.saved_selection())
            .unwrap_or_default();

        doc.begin_group();
        if range.length > 0 {
            doc.delete_text(range.index, range.length, Source::User);
        }
        doc.insert_text(range.index, &text, Source::User);
        range.set_length(text.chars().count());
        doc.format_text(range, LINK_FORMAT, FormatValue::value(url.as_str()), Source::User);
        doc.end_group();

        doc.set_selection(Range::caret(range.end()), Source::User);
        doc.set_scroll_top(scroll_top);
        SaveOutcome::LinkApplied { range, url }
    }

    fn conceal(&mut self) {
        self.deferred.cancel_all();
        self.focus = None;
    }

    fn advance(&mut self, event: TooltipEvent) {
        if let Err(err) = self.machine.transition(event) {
            tracing::warn!(%err, "tooltip transition rejected");
        }
    }
}

/// Insert an embed after the current selection. Formulas get a trailing space.
fn insert_embed(doc: &mut dyn DocumentModel, kind: EmbedKind, value: &str) -> SaveOutcome {
    if value.is_empty() {
        return SaveOutcome::Skipped(SkipReason::EmptyValue);
    }
    doc.focus();
    let Some(range) = doc.selection() else {
        return SaveOutcome::Skipped(SkipReason::NoSelection);
    };
    let index = range.end();

    doc.begin_group();
    doc.insert_embed(index, kind, value, Source::User);
    let advance = match kind {
        EmbedKind::Formula => {
            doc.insert_text(index + 1, " ", Source::User);
            2
        }
        EmbedKind::Video | EmbedKind::Image => 1,
    };
    doc.end_group();

    doc.set_selection(Range::caret(index + advance), Source::User);
    SaveOutcome::EmbedInserted {
        kind,
        index,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, Mutation};
    use crate::tooltip::TooltipError;

    fn editing_link(doc: &MemoryDocument, label: &str, url: &str) -> TooltipController {
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Link, None, EditOrigin::Other, doc);
        tooltip.label_mut().set_value(label);
        tooltip.value_mut().set_value(url);
        tooltip
    }

    #[test]
    fn link_save_replaces_span_formats_and_moves_caret() {
        let mut doc = MemoryDocument::new("see docs now")
            .with_selection(Range::new(4, 4))
            .with_scroll_top(120);
        let mut tooltip = editing_link(&doc, "Example", "example.com");
        tooltip.set_link_range(Some(Range::new(4, 4)));

        let outcome = tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(
            outcome,
            SaveOutcome::LinkApplied {
                range: Range::new(4, 7),
                url: "https://example.com".to_string(),
            }
        );
        assert_eq!(
            doc.mutations(),
            &[
                Mutation::GroupStart,
                Mutation::Delete {
                    index: 4,
                    length: 4,
                    source: Source::User,
                },
                Mutation::Insert {
                    index: 4,
                    text: "Example".to_string(),
                    source: Source::User,
                },
                Mutation::Format {
                    range: Range::new(4, 7),
                    name: "link".to_string(),
                    value: FormatValue::value("https://example.com"),
                    source: Source::User,
                },
                Mutation::GroupEnd,
                Mutation::SetSelection {
                    range: Range::caret(11),
                    source: Source::User,
                },
            ]
        );
        assert_eq!(doc.plain_text(), "see Example now");
        assert_eq!(doc.attribute_at(10, "link"), Some("https://example.com"));
        assert_eq!(doc.attribute_at(11, "link"), None);
        assert_eq!(doc.scroll_top(), 120);
        assert_eq!(tooltip.phase(), TooltipPhase::Hidden);
        assert_eq!(tooltip.link_range(), None);
        assert_eq!(tooltip.value().value(), "");
        assert!(doc.has_focus());
    }

    #[test]
    fn link_save_without_tracked_range_uses_saved_selection() {
        let mut doc = MemoryDocument::new("hello").with_selection(Range::caret(5));
        let mut tooltip = editing_link(&doc, " world", "http://example.org");

        let outcome = tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(
            outcome,
            SaveOutcome::LinkApplied {
                range: Range::new(5, 6),
                url: "http://example.org".to_string(),
            }
        );
        assert_eq!(doc.plain_text(), "hello world");
        assert_eq!(doc.selection(), Some(Range::caret(11)));
    }

    #[test]
    fn link_save_with_empty_label_mutates_nothing_and_hides() {
        let mut doc = MemoryDocument::new("hello").with_selection(Range::new(0, 5));
        let mut tooltip = editing_link(&doc, "", "example.com");

        let outcome = tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::MissingLinkField));
        assert!(doc.mutations().is_empty());
        assert_eq!(tooltip.phase(), TooltipPhase::Hidden);
        assert_eq!(doc.focus_requests(), 1);
    }

    #[test]
    fn formula_save_inserts_embed_and_space() {
        let mut doc = MemoryDocument::new("ab").with_selection(Range::new(0, 1));
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Formula, None, EditOrigin::Other, &doc);
        tooltip.value_mut().set_value("E=mc^2");

        let outcome = tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(
            outcome,
            SaveOutcome::EmbedInserted {
                kind: EmbedKind::Formula,
                index: 1,
                value: "E=mc^2".to_string(),
            }
        );
        assert_eq!(doc.embed_at(1), Some((EmbedKind::Formula, "E=mc^2")));
        assert_eq!(doc.plain_text(), "a\u{FFFC} b");
        assert_eq!(doc.selection(), Some(Range::caret(3)));
        assert_eq!(doc.content_mutations().len(), 2);
    }

    #[test]
    fn video_save_normalizes_url_and_advances_by_one() {
        let mut doc = MemoryDocument::new("ab").with_selection(Range::caret(2));
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Video, None, EditOrigin::Other, &doc);
        tooltip.value_mut().set_value("https://youtu.be/dQw4w9WgXcQ");

        tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(
            doc.embed_at(2),
            Some((
                EmbedKind::Video,
                "https://www.youtube.com/embed/dQw4w9WgXcQ?showinfo=0"
            ))
        );
        assert_eq!(doc.selection(), Some(Range::caret(3)));
    }

    #[test]
    fn empty_formula_skips_insertion_but_still_hides() {
        let mut doc = MemoryDocument::new("ab").with_selection(Range::caret(1));
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Formula, None, EditOrigin::Other, &doc);

        let outcome = tooltip.save(&mut doc).expect("open tooltip should save");

        assert_eq!(outcome, SaveOutcome::Skipped(SkipReason::EmptyValue));
        assert!(doc.mutations().is_empty());
        assert!(!tooltip.is_visible());
    }

    #[test]
    fn save_and_cancel_while_hidden_are_errors() {
        let mut doc = MemoryDocument::new("");
        let mut tooltip = TooltipController::default();

        assert!(matches!(
            tooltip.save(&mut doc),
            Err(TooltipError::InvalidStateTransition {
                from: TooltipPhase::Hidden,
                event: TooltipEvent::Save,
            })
        ));
        assert!(tooltip.cancel(&mut doc).is_err());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn create_origin_seeds_label_from_preview() {
        let doc = MemoryDocument::new("hello world").with_selection(Range::new(6, 5));
        let mut tooltip = TooltipController::default();
        tooltip.value_mut().set_value("stale");

        tooltip.edit(TooltipMode::Link, Some("world"), EditOrigin::Create, &doc);

        assert_eq!(tooltip.label().value(), "world");
        assert_eq!(tooltip.value().value(), "");
        assert_eq!(tooltip.label().placeholder(), "Enter link text");
        assert_eq!(tooltip.value().placeholder(), "Paste or type a link");
        assert_eq!(tooltip.run_deferred(), Some(TooltipField::Value));
    }

    #[test]
    fn existing_link_seeds_label_from_document() {
        let doc = MemoryDocument::new("go to example").with_selection(Range::caret(8));
        let mut tooltip = TooltipController::default();
        tooltip.set_link_range(Some(Range::new(6, 7)));

        tooltip.edit(
            TooltipMode::Link,
            Some("https://example.com"),
            EditOrigin::Other,
            &doc,
        );

        assert_eq!(tooltip.label().value(), "example");
        assert_eq!(tooltip.value().value(), "https://example.com");
        assert!(tooltip.value().is_all_selected());
        assert_eq!(tooltip.state().active_range, Some(Range::new(6, 7)));
        assert_eq!(tooltip.run_deferred(), Some(TooltipField::Label));
    }

    #[test]
    fn switching_mode_clears_value() {
        let doc = MemoryDocument::new("x").with_selection(Range::caret(1));
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Video, None, EditOrigin::Other, &doc);
        tooltip.value_mut().set_value("https://vimeo.com/1");

        tooltip.edit(TooltipMode::Video, None, EditOrigin::Other, &doc);
        assert_eq!(tooltip.value().value(), "https://vimeo.com/1");

        tooltip.edit(TooltipMode::Formula, None, EditOrigin::Other, &doc);
        assert_eq!(tooltip.value().value(), "");
        assert_eq!(tooltip.value().placeholder(), "e=mc^2");
    }

    #[test]
    fn repeated_edit_keeps_single_pending_focus_step() {
        let doc = MemoryDocument::new("abc").with_selection(Range::caret(1));
        let mut tooltip = TooltipController::default();

        tooltip.edit(TooltipMode::Link, None, EditOrigin::Other, &doc);
        let first = tooltip.session();
        tooltip.edit(TooltipMode::Link, None, EditOrigin::Other, &doc);

        assert_ne!(tooltip.session(), first);
        assert_eq!(tooltip.pending_deferred(), 1);
        assert_eq!(tooltip.phase(), TooltipPhase::Editing);
        assert_eq!(tooltip.run_deferred(), Some(TooltipField::Label));
        assert_eq!(tooltip.run_deferred(), None);
    }

    #[test]
    fn cancel_before_deferred_focus_drops_it() {
        let mut doc = MemoryDocument::new("abc").with_selection(Range::new(0, 2));
        let mut tooltip = TooltipController::default();
        tooltip.edit(TooltipMode::Link, None, EditOrigin::Other, &doc);

        tooltip.cancel(&mut doc).expect("editing tooltip should cancel");

        assert_eq!(tooltip.run_deferred(), None);
        assert_eq!(tooltip.focused_field(), None);
        assert!(doc.has_focus());
        assert!(doc.mutations().is_empty());
    }

    #[test]
    fn position_centres_under_reference_and_stays_in_container() {
        let config = TooltipConfig {
            width: 100,
            height: 40,
            bounds: Some(Bounds::new(0, 0, 300, 200)),
            ..TooltipConfig::default()
        };
        let mut tooltip = TooltipController::new(&config);
        tooltip.show();

        let shift = tooltip.position(Bounds::new(100, 20, 40, 18), 0);
        assert_eq!(shift, 0);
        assert_eq!(
            tooltip.placement(),
            Some(TooltipPlacement {
                left: 70,
                top: 38,
                flipped: false,
            })
        );

        let shift = tooltip.position(Bounds::new(280, 20, 20, 18), 0);
        assert_eq!(shift, -40);
        assert_eq!(tooltip.region(), Some(Bounds::new(200, 38, 100, 40)));

        let shift = tooltip.position(Bounds::new(0, 170, 20, 18), 10);
        assert_eq!(shift, 40);
        let placement = tooltip.placement().expect("visible tooltip has a placement");
        assert!(placement.flipped);
        assert_eq!(placement.top, 170 + 18 + 10 - (18 + 40));
    }
}
