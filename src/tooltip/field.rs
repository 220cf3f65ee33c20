use serde::{Deserialize, Serialize};

use super::TooltipMode;

/// Which tooltip input currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipField {
    Label,
    Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    placeholder: String,
    all_selected: bool,
}

impl InputField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.all_selected = false;
    }

    pub fn clear(&mut self) {
        self.set_value(String::new());
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Select the whole value so typing replaces it.
    pub fn select_all(&mut self) {
        self.all_selected = true;
    }

    pub fn is_all_selected(&self) -> bool {
        self.all_selected
    }
}

/// Placeholder text for one input, per tooltip mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaceholderTemplates {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
}

impl PlaceholderTemplates {
    pub fn default_label() -> Self {
        Self {
            link: Some("Enter link text".to_string()),
            video: Some("Embed URL".to_string()),
            formula: None,
        }
    }

    pub fn default_value() -> Self {
        Self {
            link: Some("Paste or type a link".to_string()),
            video: Some("Embed URL".to_string()),
            formula: Some("e=mc^2".to_string()),
        }
    }

    /// Missing templates render as an empty placeholder.
    pub fn for_mode(&self, mode: TooltipMode) -> &str {
        let template = match mode {
            TooltipMode::Link => &self.link,
            TooltipMode::Video => &self.video,
            TooltipMode::Formula => &self.formula,
        };
        template.as_deref().unwrap_or_default()
    }

    pub(crate) fn merged_with(&self, overrides: &PlaceholderTemplates) -> PlaceholderTemplates {
        PlaceholderTemplates {
            link: overrides.link.clone().or_else(|| self.link.clone()),
            video: overrides.video.clone().or_else(|| self.video.clone()),
            formula: overrides.formula.clone().or_else(|| self.formula.clone()),
        }
    }
}
