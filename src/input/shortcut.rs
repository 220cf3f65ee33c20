use serde::Deserialize;

use crate::tooltip::TooltipField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ShortcutModifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    /// Tooltip input holding keyboard focus, if any.
    pub focused_field: Option<TooltipField>,
    pub editor_focused: bool,
    /// The toolbar registered the link shortcut.
    pub link_binding: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TooltipFocusValue,
    TooltipSave,
    TooltipCancel,
    EditorToggleLink,
}

fn resolve_label_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Enter => Some(ShortcutAction::TooltipFocusValue),
        ShortcutKey::Escape => Some(ShortcutAction::TooltipCancel),
        ShortcutKey::Character(_) => None,
    }
}

fn resolve_value_shortcut(key: ShortcutKey) -> Option<ShortcutAction> {
    match key {
        ShortcutKey::Enter => Some(ShortcutAction::TooltipSave),
        ShortcutKey::Escape => Some(ShortcutAction::TooltipCancel),
        ShortcutKey::Character(_) => None,
    }
}

fn resolve_editor_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl) {
        (ShortcutKey::Character('k'), true) if context.link_binding => {
            Some(ShortcutAction::EditorToggleLink)
        }
        _ => None,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    match context.focused_field {
        Some(TooltipField::Label) => return resolve_label_shortcut(key),
        Some(TooltipField::Value) => return resolve_value_shortcut(key),
        None => {}
    }

    if context.editor_focused {
        return resolve_editor_shortcut(key, modifiers, context);
    }

    None
}
