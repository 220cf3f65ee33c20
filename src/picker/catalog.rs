use super::{PickerKind, PickerOption};

/// `None` stands for "no explicit format", the default entry of a picker.
pub const ALIGNS: &[Option<&str>] = &[None, Some("center"), Some("right"), Some("justify")];

pub const COLORS: &[&str] = &[
    "#000000", "#e60000", "#ff9900", "#ffff00", "#008a00", "#0066cc", "#9933ff", "#ffffff",
    "#facccc", "#ffebcc", "#ffffcc", "#cce8cc", "#cce0f5", "#ebd6ff", "#bbbbbb", "#f06666",
    "#ffc266", "#ffff66", "#66b966", "#66a3e0", "#c285ff", "#888888", "#a10000", "#b26b00",
    "#b2b200", "#006100", "#0047b2", "#6b24b2", "#444444", "#5c0000", "#663d00", "#666600",
    "#003700", "#002966", "#3d1466",
];

pub const FONTS: &[Option<&str>] = &[None, Some("serif"), Some("monospace")];

pub const HEADERS: &[Option<&str>] = &[Some("1"), Some("2"), Some("3"), None];

pub const SIZES: &[Option<&str>] = &[Some("small"), None, Some("large"), Some("huge")];

pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_COLOR: &str = "#000000";

/// Options seeded for `kind` when the host supplied none. Unknown kinds get nothing.
pub fn seed_options(kind: &PickerKind) -> Vec<PickerOption> {
    match kind {
        PickerKind::Align => fill_options(ALIGNS, None),
        PickerKind::Background => fill_colors(DEFAULT_BACKGROUND),
        PickerKind::Color => fill_colors(DEFAULT_COLOR),
        PickerKind::Font => fill_options(FONTS, None),
        PickerKind::Header => fill_options(HEADERS, None),
        PickerKind::Size => fill_options(SIZES, None),
        PickerKind::Custom(_) => Vec::new(),
    }
}

/// Build options in catalog order, flagging the entry equal to `default` as the default.
pub fn fill_options(values: &[Option<&str>], default: Option<&str>) -> Vec<PickerOption> {
    values
        .iter()
        .map(|value| PickerOption {
            value: value.map(str::to_string),
            is_default: *value == default,
        })
        .collect()
}

fn fill_colors(default: &str) -> Vec<PickerOption> {
    let values: Vec<Option<&str>> = COLORS.iter().copied().map(Some).collect();
    fill_options(&values, Some(default))
}
