use crate::config::TooltipConfig;
use crate::document::{DocumentModel, DocumentView, FormatValue, Range, Source};
use crate::events::{EditorChange, EditorListener};

use super::controller::{EditOrigin, SaveOutcome, TooltipController, TooltipState};
use super::state::{TooltipPhase, TooltipResult};
use super::{TooltipMode, LINK_FORMAT};

/// Snow-flavoured tooltip: previews the link under the caret and offers
/// edit, remove and open actions on top of the generic controller.
#[derive(Debug, Default)]
pub struct SnowTooltip {
    base: TooltipController,
    preview: Option<String>,
}

impl SnowTooltip {
    pub fn new(config: &TooltipConfig) -> Self {
        Self {
            base: TooltipController::new(config),
            preview: None,
        }
    }

    pub fn controller(&self) -> &TooltipController {
        &self.base
    }

    pub fn controller_mut(&mut self) -> &mut TooltipController {
        &mut self.base
    }

    pub fn state(&self) -> TooltipState {
        let mut state = self.base.state();
        if self.base.phase() == TooltipPhase::Previewing {
            // The preview always shows a link, even though no edit mode is set.
            state.mode = Some(TooltipMode::Link);
            state.preview_text = self.preview.clone();
        }
        state
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Preview mode carries no edit mode.
    pub fn show(&mut self) {
        self.base.show();
        self.base.clear_mode();
    }

    pub fn hide(&mut self) {
        self.base.hide();
    }

    pub fn edit(
        &mut self,
        mode: TooltipMode,
        preview: Option<&str>,
        origin: EditOrigin,
        doc: &dyn DocumentView,
    ) {
        self.base.edit(mode, preview, origin, doc);
    }

    /// The preview's edit action: edit the tracked link with its current URL.
    pub fn edit_preview(&mut self, doc: &dyn DocumentView) {
        let preview = self.preview.clone();
        self.base
            .edit(TooltipMode::Link, preview.as_deref(), EditOrigin::Other, doc);
    }

    /// The preview's remove action: strip the link format from the tracked span.
    pub fn remove_link(&mut self, doc: &mut dyn DocumentModel) {
        if let Some(range) = self.base.link_range() {
            self.base.restore_focus(doc);
            doc.format_text(range, LINK_FORMAT, FormatValue::Clear, Source::User);
            self.base.set_link_range(None);
            tracing::debug!(?range, "link removed");
        }
        self.base.hide();
    }

    /// URL for the host to open from the preview, if there is one.
    pub fn open_link(&self) -> Option<&str> {
        self.preview.as_deref().filter(|url| !url.is_empty())
    }

    pub fn save(&mut self, doc: &mut dyn DocumentModel) -> TooltipResult<SaveOutcome> {
        self.base.save(doc)
    }

    pub fn cancel(&mut self, doc: &mut dyn DocumentModel) -> TooltipResult<()> {
        self.base.cancel(doc)
    }

    /// React to a selection change: a user caret inside a link previews it,
    /// anything else hides the tooltip and drops the tracked span.
    pub fn handle_selection_change(
        &mut self,
        range: Option<Range>,
        source: Source,
        doc: &dyn DocumentView,
    ) {
        let Some(range) = range else {
            return;
        };
        if range.is_caret() && source == Source::User {
            if let Some(link) = doc.link_at(range.index) {
                self.base.set_link_range(Some(link.range));
                self.preview = Some(link.url);
                self.show();
                if let Some(bounds) = doc.bounds(link.range) {
                    self.base.position(bounds, doc.scroll_top());
                }
                return;
            }
        }
        self.base.hide();
    }
}

impl EditorListener for SnowTooltip {
    fn on_editor_change(&mut self, change: &EditorChange, doc: &dyn DocumentView) {
        if let EditorChange::SelectionChange { range, source, .. } = *change {
            self.handle_selection_change(range, source, doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, Mutation};

    const URL: &str = "https://example.com";

    fn linked_doc() -> MemoryDocument {
        MemoryDocument::new("go to example now").with_link(Range::new(6, 7), URL)
    }

    #[test]
    fn user_caret_inside_link_shows_preview() {
        let doc = linked_doc();
        let mut tooltip = SnowTooltip::default();

        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        let state = tooltip.state();
        assert!(state.visible);
        assert!(!state.editing);
        assert_eq!(state.mode, Some(TooltipMode::Link));
        assert_eq!(tooltip.controller().mode(), None);
        assert_eq!(state.active_range, Some(Range::new(6, 7)));
        assert_eq!(state.preview_text.as_deref(), Some(URL));
        assert!(tooltip.controller().placement().is_some());
        assert_eq!(tooltip.open_link(), Some(URL));
    }

    #[test]
    fn api_selection_or_plain_text_hides() {
        let doc = linked_doc();
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.handle_selection_change(Some(Range::caret(9)), Source::Api, &doc);
        assert!(!tooltip.state().visible);
        assert_eq!(tooltip.controller().link_range(), None);

        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);
        tooltip.handle_selection_change(Some(Range::caret(2)), Source::User, &doc);
        assert!(!tooltip.state().visible);
        assert_eq!(tooltip.state().preview_text, None);
    }

    #[test]
    fn leaving_the_link_drops_tracked_span() {
        let mut doc = linked_doc().with_selection(Range::caret(9));
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);
        assert_eq!(tooltip.controller().link_range(), Some(Range::new(6, 7)));

        doc.set_selection(Range::caret(1), Source::User);
        tooltip.handle_selection_change(Some(Range::caret(1)), Source::User, &doc);
        assert_eq!(tooltip.controller().link_range(), None);

        tooltip.edit(TooltipMode::Link, Some(""), EditOrigin::Create, &doc);
        tooltip.controller_mut().label_mut().set_value("X");
        tooltip.controller_mut().value_mut().set_value("x.com");
        let outcome = tooltip.save(&mut doc).expect("editing tooltip should save");

        assert_eq!(
            outcome,
            SaveOutcome::LinkApplied {
                range: Range::new(1, 1),
                url: "https://x.com".to_string(),
            }
        );
        assert_eq!(doc.plain_text(), "gXo to example now");
        assert_eq!(doc.link_at(9).map(|link| link.url), Some(URL.to_string()));
    }

    #[test]
    fn hiding_a_preview_forgets_the_link() {
        let mut doc = linked_doc().with_selection(Range::caret(2));
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.hide();
        assert_eq!(tooltip.controller().link_range(), None);

        tooltip.edit(TooltipMode::Link, Some("new"), EditOrigin::Create, &doc);
        tooltip.controller_mut().value_mut().set_value("new.example");
        tooltip.save(&mut doc).expect("editing tooltip should save");
        assert_eq!(doc.plain_text(), "gonew to example now");
    }

    #[test]
    fn create_ignores_a_still_tracked_link() {
        let mut doc = linked_doc().with_selection(Range::caret(0));
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.edit(TooltipMode::Link, Some("see "), EditOrigin::Create, &doc);
        assert_eq!(tooltip.controller().link_range(), None);
        tooltip.controller_mut().value_mut().set_value("docs.rs");
        tooltip.save(&mut doc).expect("editing tooltip should save");

        assert_eq!(doc.plain_text(), "see go to example now");
        assert_eq!(doc.link_at(13).map(|link| link.url), Some(URL.to_string()));
    }

    #[test]
    fn missing_range_is_ignored() {
        let doc = linked_doc();
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.handle_selection_change(None, Source::User, &doc);
        assert!(tooltip.state().visible);
    }

    #[test]
    fn edit_preview_seeds_fields_from_link() {
        let doc = linked_doc().with_selection(Range::caret(9));
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.edit_preview(&doc);

        let controller = tooltip.controller();
        assert!(controller.is_editing());
        assert_eq!(controller.mode(), Some(TooltipMode::Link));
        assert_eq!(controller.label().value(), "example");
        assert_eq!(controller.value().value(), URL);
        assert_eq!(tooltip.state().preview_text, None);
    }

    #[test]
    fn edited_preview_saves_over_the_link_span() {
        let mut doc = linked_doc().with_selection(Range::caret(9));
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);
        tooltip.edit_preview(&doc);
        tooltip.controller_mut().label_mut().set_value("docs");
        tooltip.controller_mut().value_mut().set_value("docs.rs");

        tooltip.save(&mut doc).expect("editing tooltip should save");

        assert_eq!(doc.plain_text(), "go to docs now");
        assert_eq!(doc.attribute_at(6, "link"), Some("https://docs.rs"));
        assert_eq!(doc.selection(), Some(Range::caret(10)));
    }

    #[test]
    fn remove_link_clears_format_over_span() {
        let mut doc = linked_doc();
        let mut tooltip = SnowTooltip::default();
        tooltip.handle_selection_change(Some(Range::caret(9)), Source::User, &doc);

        tooltip.remove_link(&mut doc);

        assert_eq!(
            doc.mutations(),
            &[Mutation::Format {
                range: Range::new(6, 7),
                name: "link".to_string(),
                value: FormatValue::Clear,
                source: Source::User,
            }]
        );
        assert!(doc.link_at(9).is_none());
        assert!(!tooltip.state().visible);
        assert!(doc.has_focus());
    }

    #[test]
    fn remove_without_tracked_link_only_hides() {
        let mut doc = linked_doc();
        let mut tooltip = SnowTooltip::default();
        tooltip.show();

        tooltip.remove_link(&mut doc);

        assert!(doc.mutations().is_empty());
        assert!(!tooltip.state().visible);
    }
}
