mod shortcut;

pub use shortcut::{resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers};
