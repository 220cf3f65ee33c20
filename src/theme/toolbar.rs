use serde::Deserialize;

use crate::icons::{IconCatalog, IconEntry};
use crate::picker::{ControlDescriptor, PickerKind, PickerOption};

const CLASS_PREFIX: &str = "ql-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    Button {
        format: String,
        value: Option<String>,
    },
    /// A select control; an empty `values` list leaves seeding to the catalog.
    Picker {
        format: String,
        values: Vec<Option<String>>,
    },
}

impl ToolbarItem {
    pub fn button(format: &str) -> Self {
        Self::Button {
            format: format.to_string(),
            value: None,
        }
    }

    pub fn valued_button(format: &str, value: &str) -> Self {
        Self::Button {
            format: format.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn picker(format: &str, values: &[Option<&str>]) -> Self {
        Self::Picker {
            format: format.to_string(),
            values: values.iter().map(|value| value.map(str::to_string)).collect(),
        }
    }
}

/// Toolbar contents as groups of controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarLayout {
    pub groups: Vec<Vec<ToolbarItem>>,
}

impl ToolbarLayout {
    /// Header picker, inline styles with link, lists, clean.
    pub fn snow_default() -> Self {
        Self {
            groups: vec![
                vec![ToolbarItem::picker(
                    "header",
                    &[Some("1"), Some("2"), Some("3"), None],
                )],
                vec![
                    ToolbarItem::button("bold"),
                    ToolbarItem::button("italic"),
                    ToolbarItem::button("underline"),
                    ToolbarItem::button("link"),
                ],
                vec![
                    ToolbarItem::valued_button("list", "ordered"),
                    ToolbarItem::valued_button("list", "bullet"),
                ],
                vec![ToolbarItem::button("clean")],
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarButton {
    pub classes: String,
    pub value: Option<String>,
    pub icon: Option<String>,
}

impl ToolbarButton {
    pub fn new(classes: impl Into<String>, value: Option<String>) -> Self {
        Self {
            classes: classes.into(),
            value,
            icon: None,
        }
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.classes
            .split_whitespace()
            .filter_map(|class| class.strip_prefix(CLASS_PREFIX))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toolbar {
    buttons: Vec<ToolbarButton>,
    controls: Vec<ControlDescriptor>,
}

impl Toolbar {
    pub fn new(buttons: Vec<ToolbarButton>, controls: Vec<ControlDescriptor>) -> Self {
        Self { buttons, controls }
    }

    pub fn from_layout(layout: &ToolbarLayout) -> Self {
        let mut toolbar = Self::default();
        for item in layout.groups.iter().flatten() {
            match item {
                ToolbarItem::Button { format, value } => toolbar
                    .buttons
                    .push(ToolbarButton::new(format!("{CLASS_PREFIX}{format}"), value.clone())),
                ToolbarItem::Picker { format, values } => {
                    // A `None` value is the entry shown when the format is absent.
                    let options = values
                        .iter()
                        .map(|value| PickerOption::new(value.as_deref(), value.is_none()))
                        .collect();
                    toolbar.controls.push(ControlDescriptor::with_options(
                        PickerKind::from_format(format),
                        options,
                    ));
                }
            }
        }
        toolbar
    }

    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    pub fn controls(&self) -> &[ControlDescriptor] {
        &self.controls
    }

    pub fn has_button(&self, format: &str) -> bool {
        self.buttons
            .iter()
            .any(|button| button.formats().any(|name| name == format))
    }

    /// Assign each button the icon its format class maps to.
    pub fn build_buttons(&mut self, icons: &IconCatalog) {
        for button in &mut self.buttons {
            let icon = button
                .formats()
                .filter_map(|name| button_icon(name, button.value.as_deref(), icons))
                .last();
            if icon.is_some() {
                button.icon = icon;
            }
        }
    }
}

fn button_icon(name: &str, value: Option<&str>, icons: &IconCatalog) -> Option<String> {
    match icons.get(name)? {
        IconEntry::Set(set) if name == "direction" => {
            let ltr = set.get("").map(String::as_str).unwrap_or_default();
            let rtl = set.get("rtl").map(String::as_str).unwrap_or_default();
            Some(format!("{ltr}{rtl}"))
        }
        IconEntry::Glyph(glyph) => Some(glyph.clone()),
        IconEntry::Set(set) => set.get(value.unwrap_or_default()).cloned(),
    }
}

/// Toolbar handlers the theme implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarAction {
    /// `true` starts a link on the selection, `false` removes the link format.
    Link(bool),
    Video,
    Formula,
}
