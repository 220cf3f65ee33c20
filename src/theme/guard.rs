use crate::document::DocumentView;
use crate::geometry::Point;
use crate::picker::{PickerId, PickerRegistry};
use crate::tooltip::{SnowTooltip, TooltipField};

/// What a pointer-down outside the overlay dismissed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardOutcome {
    pub tooltip_hidden: bool,
    pub closed_pickers: Vec<PickerId>,
    /// The guard found the editor detached and unregistered itself.
    pub detached: bool,
}

/// Document-wide pointer listener that dismisses the tooltip and open
/// pickers when the user presses somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutsideInteractionGuard {
    attached: bool,
}

impl Default for OutsideInteractionGuard {
    fn default() -> Self {
        Self::attach()
    }
}

impl OutsideInteractionGuard {
    pub fn attach() -> Self {
        Self { attached: true }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn detach(&mut self) {
        if self.attached {
            tracing::debug!("outside interaction guard detached");
        }
        self.attached = false;
    }

    pub fn handle_pointer_down(
        &mut self,
        point: Point,
        doc: &dyn DocumentView,
        tooltip: &mut SnowTooltip,
        pickers: &mut PickerRegistry,
    ) -> GuardOutcome {
        if !self.attached {
            return GuardOutcome::default();
        }
        if !doc.is_attached() {
            self.detach();
            return GuardOutcome {
                detached: true,
                ..GuardOutcome::default()
            };
        }

        let controller = tooltip.controller();
        let inside_tooltip = controller
            .region()
            .is_some_and(|region| region.contains(point));
        let typing_value = controller.focused_field() == Some(TooltipField::Value);
        let tooltip_hidden =
            controller.is_visible() && !inside_tooltip && !typing_value && !doc.has_focus();
        if tooltip_hidden {
            tooltip.hide();
        }

        let closed_pickers = pickers.close_outside(point);
        if tooltip_hidden || !closed_pickers.is_empty() {
            tracing::debug!(
                ?point,
                tooltip_hidden,
                closed = closed_pickers.len(),
                "dismissed overlay on outside pointer down"
            );
        }

        GuardOutcome {
            tooltip_hidden,
            closed_pickers,
            detached: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{MemoryDocument, Range};
    use crate::icons::IconCatalog;
    use crate::picker::{ControlDescriptor, PickerKind};
    use crate::tooltip::{EditOrigin, TooltipMode};

    fn editing_tooltip(doc: &MemoryDocument) -> SnowTooltip {
        let mut tooltip = SnowTooltip::default();
        tooltip.edit(TooltipMode::Link, Some(""), EditOrigin::Other, doc);
        tooltip
    }

    fn pickers() -> PickerRegistry {
        PickerRegistry::build(
            vec![
                ControlDescriptor::new(PickerKind::Align),
                ControlDescriptor::new(PickerKind::Size),
            ],
            &IconCatalog::snow(),
        )
    }

    fn unfocused_doc() -> MemoryDocument {
        let mut doc = MemoryDocument::new("hello world").with_selection(Range::new(0, 5));
        doc.blur();
        doc
    }

    #[test]
    fn pointer_outside_hides_visible_tooltip() {
        let doc = unfocused_doc();
        let mut tooltip = editing_tooltip(&doc);
        tooltip.controller_mut().focus_field(TooltipField::Label);
        let mut registry = pickers();
        let mut guard = OutsideInteractionGuard::attach();

        let outcome =
            guard.handle_pointer_down(Point::new(5000, 5000), &doc, &mut tooltip, &mut registry);

        assert!(outcome.tooltip_hidden);
        assert!(!tooltip.controller().is_visible());
    }

    #[test]
    fn pointer_inside_tooltip_keeps_it_open() {
        let doc = unfocused_doc();
        let mut tooltip = editing_tooltip(&doc);
        tooltip.controller_mut().focus_field(TooltipField::Label);
        let region = tooltip
            .controller()
            .region()
            .expect("editing tooltip should be positioned");
        let mut registry = pickers();
        let mut guard = OutsideInteractionGuard::attach();

        let outcome = guard.handle_pointer_down(
            Point::new(region.left() + 1, region.top() + 1),
            &doc,
            &mut tooltip,
            &mut registry,
        );

        assert!(!outcome.tooltip_hidden);
        assert!(tooltip.controller().is_visible());
    }

    #[test]
    fn focused_value_field_or_document_keeps_tooltip_open() {
        let doc = unfocused_doc();
        let mut tooltip = editing_tooltip(&doc);
        tooltip.controller_mut().focus_field(TooltipField::Value);
        let mut registry = pickers();
        let mut guard = OutsideInteractionGuard::attach();

        let outcome =
            guard.handle_pointer_down(Point::new(5000, 5000), &doc, &mut tooltip, &mut registry);
        assert!(!outcome.tooltip_hidden);

        let focused = MemoryDocument::new("hello").with_selection(Range::caret(1));
        tooltip.controller_mut().focus_field(TooltipField::Label);
        let outcome = guard.handle_pointer_down(
            Point::new(5000, 5000),
            &focused,
            &mut tooltip,
            &mut registry,
        );
        assert!(!outcome.tooltip_hidden);
        assert!(tooltip.controller().is_visible());
    }

    #[test]
    fn closes_open_pickers_not_containing_the_point() {
        let doc = unfocused_doc();
        let mut tooltip = SnowTooltip::default();
        let mut registry = pickers();
        let ids: Vec<PickerId> = registry.iter().map(|picker| picker.id()).collect();
        registry.toggle(ids[0]);
        let near = registry.get_mut(ids[0]).expect("align picker");
        near.set_region(crate::geometry::Bounds::new(0, 0, 50, 50));
        let mut guard = OutsideInteractionGuard::attach();

        let outcome =
            guard.handle_pointer_down(Point::new(10, 10), &doc, &mut tooltip, &mut registry);
        assert!(outcome.closed_pickers.is_empty());

        let outcome =
            guard.handle_pointer_down(Point::new(100, 100), &doc, &mut tooltip, &mut registry);
        assert_eq!(outcome.closed_pickers, vec![ids[0]]);
        assert!(registry.open_pickers().is_empty());
    }

    #[test]
    fn detaches_once_editor_leaves_the_document() {
        let mut doc = unfocused_doc();
        let mut tooltip = editing_tooltip(&doc);
        let mut registry = pickers();
        let mut guard = OutsideInteractionGuard::attach();
        doc.detach();

        let outcome =
            guard.handle_pointer_down(Point::new(5000, 5000), &doc, &mut tooltip, &mut registry);
        assert!(outcome.detached);
        assert!(!outcome.tooltip_hidden);
        assert!(!guard.is_attached());

        let outcome =
            guard.handle_pointer_down(Point::new(5000, 5000), &doc, &mut tooltip, &mut registry);
        assert_eq!(outcome, GuardOutcome::default());
        assert!(tooltip.controller().is_visible());
    }
}
