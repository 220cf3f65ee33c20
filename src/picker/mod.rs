//! Toolbar dropdowns bound to a formatting attribute.

pub mod catalog;
mod registry;

use std::collections::BTreeMap;

use crate::document::{FormatValue, Formats};
use crate::geometry::{Bounds, Point};

pub use registry::{ControlDescriptor, FormatChange, PickerRegistry};

const CLASS_PREFIX: &str = "ql-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PickerKind {
    Align,
    Background,
    Color,
    Font,
    Header,
    Size,
    /// Any other format; receives a plain picker with the host's options.
    Custom(String),
}

impl PickerKind {
    pub fn from_format(name: &str) -> Self {
        match name {
            "align" => Self::Align,
            "background" => Self::Background,
            "color" => Self::Color,
            "font" => Self::Font,
            "header" => Self::Header,
            "size" => Self::Size,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Resolve the kind from a control's class list, e.g. `"ql-size ql-wide"`.
    ///
    /// A recognised format class wins over earlier unknown ones.
    pub fn from_class_list(classes: &str) -> Option<Self> {
        let mut formats = classes
            .split_whitespace()
            .filter_map(|class| class.strip_prefix(CLASS_PREFIX))
            .map(Self::from_format)
            .peekable();
        let first = formats.peek().cloned()?;
        Some(
            formats
                .find(|kind| !matches!(kind, Self::Custom(_)))
                .unwrap_or(first),
        )
    }

    pub fn format_name(&self) -> &str {
        match self {
            Self::Align => "align",
            Self::Background => "background",
            Self::Color => "color",
            Self::Font => "font",
            Self::Header => "header",
            Self::Size => "size",
            Self::Custom(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    /// `None` means "no explicit format".
    pub value: Option<String>,
    pub is_default: bool,
}

impl PickerOption {
    pub fn new(value: Option<&str>, is_default: bool) -> Self {
        Self {
            value: value.map(str::to_string),
            is_default,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PickerId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerVariant {
    Plain,
    /// Swatch picker; the label shows the selected colour next to `icon`.
    Color { icon: Option<String> },
    /// Every option renders as an icon keyed by its value (`""` for the default).
    Icon { icons: BTreeMap<String, String> },
}

#[derive(Debug, Clone)]
pub struct PickerWidget {
    id: PickerId,
    kind: PickerKind,
    variant: PickerVariant,
    options: Vec<PickerOption>,
    selected: Option<usize>,
    open: bool,
    region: Option<Bounds>,
}

impl PickerWidget {
    pub fn new(
        id: PickerId,
        kind: PickerKind,
        variant: PickerVariant,
        options: Vec<PickerOption>,
    ) -> Self {
        let selected = default_index(&options).or(if options.is_empty() { None } else { Some(0) });
        Self {
            id,
            kind,
            variant,
            options,
            selected,
            open: false,
            region: None,
        }
    }

    pub fn id(&self) -> PickerId {
        self.id
    }

    pub fn kind(&self) -> &PickerKind {
        &self.kind
    }

    pub fn variant(&self) -> &PickerVariant {
        &self.variant
    }

    pub fn options(&self) -> &[PickerOption] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&PickerOption> {
        self.options.get(self.selected?)
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected_option()?.value.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn set_region(&mut self, region: Bounds) {
        self.region = Some(region);
    }

    /// A picker with no known region contains nothing.
    pub fn contains(&self, point: Point) -> bool {
        self.region.is_some_and(|region| region.contains(point))
    }

    /// Reflect the document's formats into the selection. Returns whether it changed.
    ///
    /// A missing format selects the default option; a value with no matching option
    /// clears the selection.
    pub fn update(&mut self, formats: &Formats) -> bool {
        let next = match formats.get(self.kind.format_name()) {
            None => default_index(&self.options),
            Some(value) => self
                .options
                .iter()
                .position(|option| option.value.as_deref() == Some(value)),
        };
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    /// Pick an option as the user would. Closes the picker and returns the value to apply.
    pub fn select(&mut self, index: usize) -> Option<FormatValue> {
        let option = self.options.get(index)?;
        let value = match (&option.value, option.is_default) {
            (Some(value), false) => FormatValue::value(value.as_str()),
            _ => FormatValue::Clear,
        };
        self.selected = Some(index);
        self.close();
        Some(value)
    }

    /// Colour shown in a swatch picker's label.
    pub fn label_color(&self) -> Option<&str> {
        match self.variant {
            PickerVariant::Color { .. } => self.selected_value(),
            _ => None,
        }
    }

    /// Icon shown in an icon picker's label, falling back to the default option's icon.
    pub fn label_icon(&self) -> Option<&str> {
        let PickerVariant::Icon { icons } = &self.variant else {
            return None;
        };
        let option = self
            .selected_option()
            .or_else(|| default_index(&self.options).and_then(|index| self.options.get(index)))?;
        icons
            .get(option.value.as_deref().unwrap_or_default())
            .map(String::as_str)
    }
}

fn default_index(options: &[PickerOption]) -> Option<usize> {
    options.iter().position(|option| option.is_default)
}
