//! Snow theme: wires the tooltip, pickers and dismissal guard to an editor.

mod guard;
mod toolbar;

use std::cell::{Ref, RefCell, RefMut};
use std::path::Path;
use std::rc::Rc;

use crate::config::OverlayConfig;
use crate::document::{DocumentModel, DocumentView, FormatValue, Source, UploadFile, Uploader};
use crate::error::OverlayResult;
use crate::events::{EditorListener, Emitter, ListenerId};
use crate::geometry::Point;
use crate::icons::IconCatalog;
use crate::input::{resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers};
use crate::picker::{FormatChange, PickerId, PickerRegistry};
use crate::tooltip::{
    EditOrigin, SaveOutcome, SnowTooltip, TooltipField, TooltipMode, TooltipResult, LINK_FORMAT,
};

pub use guard::{GuardOutcome, OutsideInteractionGuard};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarButton, ToolbarItem, ToolbarLayout};

/// Composes the snow overlay for one editor.
///
/// The tooltip and picker registry are shared with the [`Emitter`] as listeners; call
/// [`SnowTheme::destroy`] with the same emitter to unregister them.
#[derive(Debug)]
pub struct SnowTheme {
    config: OverlayConfig,
    icons: IconCatalog,
    tooltip: Rc<RefCell<SnowTooltip>>,
    pickers: Rc<RefCell<PickerRegistry>>,
    guard: OutsideInteractionGuard,
    toolbar: Option<Toolbar>,
    subscriptions: Vec<ListenerId>,
    link_binding: bool,
}

impl SnowTheme {
    /// Build the theme; an unreadable icon catalog falls back to the snow icons.
    pub fn new(config: OverlayConfig) -> Self {
        let icons = resolve_icons(config.icons.as_deref());
        Self::with_icons(config, icons)
    }

    /// Like [`SnowTheme::new`] but fails when the configured icon catalog cannot be loaded.
    pub fn try_new(config: OverlayConfig) -> OverlayResult<Self> {
        let icons = match config.icons.as_deref() {
            Some(path) => IconCatalog::load(path)?,
            None => IconCatalog::snow(),
        };
        Ok(Self::with_icons(config, icons))
    }

    pub fn with_icons(config: OverlayConfig, icons: IconCatalog) -> Self {
        let tooltip = SnowTooltip::new(&config.tooltip);
        Self {
            config,
            icons,
            tooltip: Rc::new(RefCell::new(tooltip)),
            pickers: Rc::new(RefCell::new(PickerRegistry::default())),
            guard: OutsideInteractionGuard::attach(),
            toolbar: None,
            subscriptions: Vec::new(),
            link_binding: false,
        }
    }

    /// Decorate `toolbar`: assign button icons, build its pickers, bind the link
    /// shortcut and start listening for editor changes.
    pub fn extend_toolbar(&mut self, mut toolbar: Toolbar, emitter: &mut Emitter) {
        self.unsubscribe(emitter);

        toolbar.build_buttons(&self.icons);
        *self.pickers.borrow_mut() = PickerRegistry::build(toolbar.controls().to_vec(), &self.icons);
        self.link_binding = toolbar.has_button(LINK_FORMAT);

        let pickers: Rc<RefCell<dyn EditorListener>> = self.pickers.clone();
        let tooltip: Rc<RefCell<dyn EditorListener>> = self.tooltip.clone();
        self.subscriptions.push(emitter.subscribe(pickers));
        self.subscriptions.push(emitter.subscribe(tooltip));

        tracing::info!(
            buttons = toolbar.buttons().len(),
            pickers = self.pickers.borrow().len(),
            link_binding = self.link_binding,
            "toolbar extended"
        );
        self.toolbar = Some(toolbar);
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn icons(&self) -> &IconCatalog {
        &self.icons
    }

    pub fn toolbar(&self) -> Option<&Toolbar> {
        self.toolbar.as_ref()
    }

    pub fn tooltip(&self) -> Ref<'_, SnowTooltip> {
        self.tooltip.borrow()
    }

    pub fn tooltip_mut(&self) -> RefMut<'_, SnowTooltip> {
        self.tooltip.borrow_mut()
    }

    pub fn pickers(&self) -> Ref<'_, PickerRegistry> {
        self.pickers.borrow()
    }

    pub fn link_binding(&self) -> bool {
        self.link_binding
    }

    pub fn guard(&self) -> &OutsideInteractionGuard {
        &self.guard
    }

    /// Run a toolbar handler.
    pub fn trigger<D: DocumentModel>(&mut self, action: ToolbarAction, doc: &mut D) {
        tracing::debug!(?action, "toolbar action");
        match action {
            ToolbarAction::Link(true) => {
                let preview = doc
                    .selection()
                    .map(|range| doc.text(range))
                    .unwrap_or_default();
                self.tooltip.borrow_mut().edit(
                    TooltipMode::Link,
                    Some(&preview),
                    EditOrigin::Create,
                    &*doc,
                );
            }
            ToolbarAction::Link(false) => doc.format(LINK_FORMAT, FormatValue::Clear, Source::User),
            ToolbarAction::Video => {
                self.tooltip
                    .borrow_mut()
                    .edit(TooltipMode::Video, None, EditOrigin::Other, &*doc);
            }
            ToolbarAction::Formula => {
                self.tooltip
                    .borrow_mut()
                    .edit(TooltipMode::Formula, None, EditOrigin::Other, &*doc);
            }
        }
    }

    /// Image button: the host ran its file picker, hand the chosen files to `uploader`
    /// at the focused selection.
    pub fn upload_images<D: DocumentModel>(
        &mut self,
        uploader: &mut dyn Uploader,
        files: &[UploadFile],
        doc: &mut D,
    ) -> usize {
        doc.focus();
        let range = doc.selection().unwrap_or_default();
        let inserted = uploader.upload(doc, range, files);
        tracing::debug!(?range, files = files.len(), inserted, "images uploaded");
        inserted
    }

    /// Route a key press to the tooltip fields or the editor binding.
    pub fn handle_key<D: DocumentModel>(
        &mut self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
        doc: &mut D,
    ) -> TooltipResult<Option<ShortcutAction>> {
        let context = InputContext {
            focused_field: self.tooltip.borrow().controller().focused_field(),
            editor_focused: doc.has_focus(),
            link_binding: self.link_binding,
        };
        let Some(action) = resolve_shortcut(key, modifiers, context) else {
            return Ok(None);
        };

        match action {
            ShortcutAction::TooltipFocusValue => self
                .tooltip
                .borrow_mut()
                .controller_mut()
                .focus_field(TooltipField::Value),
            ShortcutAction::TooltipSave => {
                self.save(doc)?;
            }
            ShortcutAction::TooltipCancel => self.cancel(doc)?,
            ShortcutAction::EditorToggleLink => {
                let linked = doc
                    .selection()
                    .is_some_and(|range| doc.formats(range).contains(LINK_FORMAT));
                self.trigger(ToolbarAction::Link(!linked), doc);
            }
        }
        Ok(Some(action))
    }

    pub fn save<D: DocumentModel>(&mut self, doc: &mut D) -> TooltipResult<SaveOutcome> {
        self.tooltip.borrow_mut().save(doc)
    }

    pub fn cancel<D: DocumentModel>(&mut self, doc: &mut D) -> TooltipResult<()> {
        self.tooltip.borrow_mut().cancel(doc)
    }

    pub fn toggle_picker(&mut self, id: PickerId) -> bool {
        self.pickers.borrow_mut().toggle(id)
    }

    /// Pick option `index` of picker `id` and apply the format to the selection.
    pub fn choose_picker<D: DocumentModel>(
        &mut self,
        id: PickerId,
        index: usize,
        doc: &mut D,
    ) -> Option<FormatChange> {
        let change = self.pickers.borrow_mut().choose(id, index)?;
        doc.format(&change.format, change.value.clone(), Source::User);
        Some(change)
    }

    pub fn pointer_down(&mut self, point: Point, doc: &dyn DocumentView) -> GuardOutcome {
        self.guard.handle_pointer_down(
            point,
            doc,
            &mut self.tooltip.borrow_mut(),
            &mut self.pickers.borrow_mut(),
        )
    }

    /// Run deferred tooltip work once the host finished a layout pass.
    pub fn tick(&mut self) -> Option<TooltipField> {
        self.tooltip.borrow_mut().controller_mut().run_deferred()
    }

    /// Stop listening to the editor and the document.
    pub fn destroy(&mut self, emitter: &mut Emitter) {
        self.unsubscribe(emitter);
        self.guard.detach();
    }

    fn unsubscribe(&mut self, emitter: &mut Emitter) {
        for id in self.subscriptions.drain(..) {
            emitter.unsubscribe(id);
        }
    }
}

impl Default for SnowTheme {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

fn resolve_icons(path: Option<&Path>) -> IconCatalog {
    let Some(path) = path else {
        return IconCatalog::snow();
    };
    match IconCatalog::load(path) {
        Ok(icons) => icons,
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to load icon catalog; using snow icons");
            IconCatalog::snow()
        }
    }
}
