//! Toolbar icon catalogs.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type IconResult<T> = std::result::Result<T, IconError>;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to read icon catalog: {path}")]
    ReadCatalog { path: PathBuf, source: io::Error },
    #[error("failed to parse icon catalog")]
    ParseCatalog(#[from] serde_json::Error),
}

/// A single glyph, or a set of glyphs keyed by control value (`""` is the default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconEntry {
    Glyph(String),
    Set(BTreeMap<String, String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconCatalog {
    entries: BTreeMap<String, IconEntry>,
}

impl IconCatalog {
    /// The icon set shipped with the snow theme.
    pub fn snow() -> Self {
        fn glyph(name: &str) -> IconEntry {
            IconEntry::Glyph(format!("icon-{name}"))
        }

        fn set(pairs: &[(&str, &str)]) -> IconEntry {
            IconEntry::Set(
                pairs
                    .iter()
                    .map(|(value, icon)| (value.to_string(), format!("icon-{icon}")))
                    .collect(),
            )
        }

        let entries = [
            (
                "align",
                set(&[
                    ("", "align-left"),
                    ("center", "align-center"),
                    ("right", "align-right"),
                    ("justify", "align-justify"),
                ]),
            ),
            ("background", glyph("background")),
            ("blockquote", glyph("blockquote")),
            ("bold", glyph("bold")),
            ("clean", glyph("clean")),
            ("code", glyph("code")),
            ("code-block", glyph("code")),
            ("color", glyph("color")),
            ("direction", set(&[("", "direction-ltr"), ("rtl", "direction-rtl")])),
            ("formula", glyph("formula")),
            ("header", set(&[("1", "header-1"), ("2", "header-2"), ("3", "header-3")])),
            ("italic", glyph("italic")),
            ("image", glyph("image")),
            ("indent", set(&[("+1", "indent"), ("-1", "outdent")])),
            ("link", glyph("link")),
            (
                "list",
                set(&[
                    ("bullet", "list-bullet"),
                    ("check", "list-check"),
                    ("ordered", "list-ordered"),
                ]),
            ),
            ("script", set(&[("sub", "subscript"), ("super", "superscript")])),
            ("strike", glyph("strike")),
            ("underline", glyph("underline")),
            ("video", glyph("video")),
        ]
        .into_iter()
        .map(|(name, entry)| (name.to_string(), entry))
        .collect();

        Self { entries }
    }

    pub fn from_json(serialized: &str) -> IconResult<Self> {
        Ok(serde_json::from_str(serialized)?)
    }

    pub fn load(path: &Path) -> IconResult<Self> {
        let serialized = fs::read_to_string(path).map_err(|source| IconError::ReadCatalog {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&serialized)
    }

    pub fn get(&self, name: &str) -> Option<&IconEntry> {
        self.entries.get(name)
    }

    pub fn glyph(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            IconEntry::Glyph(glyph) => Some(glyph),
            IconEntry::Set(_) => None,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: IconEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snow_catalog_has_structured_align_set() {
        let icons = IconCatalog::snow();
        assert!(matches!(icons.get("align"), Some(IconEntry::Set(set)) if set.contains_key("")));
        assert_eq!(icons.glyph("bold"), Some("icon-bold"));
        assert_eq!(icons.glyph("align"), None);
    }

    #[test]
    fn json_catalog_mixes_glyphs_and_sets() {
        let icons = IconCatalog::from_json(
            r#"{ "bold": "<b/>", "align": { "": "<left/>", "center": "<center/>" } }"#,
        )
        .expect("catalog json should parse");

        assert_eq!(icons.len(), 2);
        assert_eq!(icons.glyph("bold"), Some("<b/>"));
        let Some(IconEntry::Set(align)) = icons.get("align") else {
            panic!("align should be a set");
        };
        assert_eq!(align.get("center").map(String::as_str), Some("<center/>"));
    }

    #[test]
    fn invalid_catalog_reports_parse_error() {
        let err = IconCatalog::from_json(r#"{ "bold": 3 }"#).unwrap_err();
        assert!(matches!(err, IconError::ParseCatalog(_)));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = IconCatalog::load(Path::new("/nonexistent/snow-overlay/icons.json")).unwrap_err();
        assert!(matches!(err, IconError::ReadCatalog { .. }));
    }
}
