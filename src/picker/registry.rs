use crate::document::{DocumentView, FormatValue, Formats};
use crate::events::{EditorChange, EditorListener};
use crate::geometry::Point;
use crate::icons::{IconCatalog, IconEntry};

use super::catalog::seed_options;
use super::{PickerId, PickerKind, PickerOption, PickerVariant, PickerWidget};

/// A toolbar select control as declared by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub kind: PickerKind,
    /// Options the host already populated; empty means "seed from the catalog".
    pub options: Vec<PickerOption>,
}

impl ControlDescriptor {
    pub fn new(kind: PickerKind) -> Self {
        Self {
            kind,
            options: Vec::new(),
        }
    }

    pub fn with_options(kind: PickerKind, options: Vec<PickerOption>) -> Self {
        Self { kind, options }
    }

    pub fn from_class_list(classes: &str) -> Option<Self> {
        PickerKind::from_class_list(classes).map(Self::new)
    }
}

/// A format to apply after the user picked an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChange {
    pub format: String,
    pub value: FormatValue,
}

/// Owns the pickers of one toolbar and keeps them in sync with the document.
#[derive(Debug, Default)]
pub struct PickerRegistry {
    pickers: Vec<PickerWidget>,
}

impl PickerRegistry {
    /// Build one picker per control, seeding empty option lists from the static catalogs.
    ///
    /// Alignment becomes an icon picker only when `icons` has a structured `align` entry,
    /// colour and background become swatch pickers, everything else a plain picker.
    pub fn build(controls: Vec<ControlDescriptor>, icons: &IconCatalog) -> Self {
        let pickers = controls
            .into_iter()
            .enumerate()
            .map(|(index, control)| build_widget(PickerId(index), control, icons))
            .collect();
        Self { pickers }
    }

    pub fn len(&self) -> usize {
        self.pickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PickerWidget> {
        self.pickers.iter()
    }

    pub fn get(&self, id: PickerId) -> Option<&PickerWidget> {
        self.pickers.get(id.0)
    }

    pub fn get_mut(&mut self, id: PickerId) -> Option<&mut PickerWidget> {
        self.pickers.get_mut(id.0)
    }

    pub fn find(&self, kind: &PickerKind) -> Option<&PickerWidget> {
        self.pickers.iter().find(|picker| picker.kind() == kind)
    }

    pub fn open_pickers(&self) -> Vec<PickerId> {
        self.pickers
            .iter()
            .filter(|picker| picker.is_open())
            .map(PickerWidget::id)
            .collect()
    }

    /// Reflect the formats at the current selection into every picker. Read-only on the document.
    pub fn update(&mut self, doc: &dyn DocumentView) -> usize {
        let formats = doc
            .selection()
            .map(|range| doc.formats(range))
            .unwrap_or_else(Formats::new);
        let changed = self
            .pickers
            .iter_mut()
            .map(|picker| picker.update(&formats))
            .filter(|changed| *changed)
            .count();
        if changed > 0 {
            tracing::trace!(changed, "pickers updated from document formats");
        }
        changed
    }

    /// Open one picker and close every other one.
    pub fn open(&mut self, id: PickerId) -> bool {
        self.close_all_except(Some(id));
        let Some(picker) = self.get_mut(id) else {
            return false;
        };
        picker.open();
        true
    }

    /// Toggle one picker open or closed; every other picker is closed.
    pub fn toggle(&mut self, id: PickerId) -> bool {
        self.close_all_except(Some(id));
        let Some(picker) = self.get_mut(id) else {
            return false;
        };
        picker.toggle();
        picker.is_open()
    }

    pub fn close_all_except(&mut self, keep: Option<PickerId>) -> Vec<PickerId> {
        let mut closed = Vec::new();
        for picker in &mut self.pickers {
            if Some(picker.id()) != keep && picker.is_open() {
                picker.close();
                closed.push(picker.id());
            }
        }
        closed
    }

    /// Close every open picker whose region does not contain `point`.
    pub fn close_outside(&mut self, point: Point) -> Vec<PickerId> {
        let mut closed = Vec::new();
        for picker in &mut self.pickers {
            if picker.is_open() && !picker.contains(point) {
                picker.close();
                closed.push(picker.id());
            }
        }
        closed
    }

    /// The user picked option `index` of picker `id`.
    pub fn choose(&mut self, id: PickerId, index: usize) -> Option<FormatChange> {
        let picker = self.get_mut(id)?;
        let value = picker.select(index)?;
        Some(FormatChange {
            format: picker.kind().format_name().to_string(),
            value,
        })
    }
}

impl EditorListener for PickerRegistry {
    fn on_editor_change(&mut self, _change: &EditorChange, doc: &dyn DocumentView) {
        self.update(doc);
    }
}

fn build_widget(id: PickerId, control: ControlDescriptor, icons: &IconCatalog) -> PickerWidget {
    let ControlDescriptor { kind, mut options } = control;
    if options.is_empty() {
        options = seed_options(&kind);
    }
    let variant = match &kind {
        PickerKind::Align => match icons.get(kind.format_name()) {
            Some(IconEntry::Set(set)) => PickerVariant::Icon { icons: set.clone() },
            _ => PickerVariant::Plain,
        },
        PickerKind::Background | PickerKind::Color => PickerVariant::Color {
            icon: icons.glyph(kind.format_name()).map(str::to_string),
        },
        _ => PickerVariant::Plain,
    };
    tracing::debug!(?id, kind = kind.format_name(), options = options.len(), "picker built");
    PickerWidget::new(id, kind, variant, options)
}
