use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::geometry::Bounds;
use crate::tooltip::PlaceholderTemplates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "snow-overlay";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_TOOLTIP_WIDTH: u32 = 320;
const DEFAULT_TOOLTIP_HEIGHT: u32 = 96;

/// Overlay settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub tooltip: TooltipConfig,
    /// Optional JSON icon catalog replacing the built-in snow icons.
    #[serde(default)]
    pub icons: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub width: u32,
    pub height: u32,
    /// Area the tooltip must stay inside, in screen coordinates.
    pub bounds: Option<Bounds>,
    /// Per-mode overrides on top of the built-in label placeholders.
    pub label_placeholders: PlaceholderTemplates,
    pub value_placeholders: PlaceholderTemplates,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_TOOLTIP_WIDTH,
            height: DEFAULT_TOOLTIP_HEIGHT,
            bounds: None,
            label_placeholders: PlaceholderTemplates::default(),
            value_placeholders: PlaceholderTemplates::default(),
        }
    }
}

impl TooltipConfig {
    pub fn resolved_label_placeholders(&self) -> PlaceholderTemplates {
        PlaceholderTemplates::default_label().merged_with(&self.label_placeholders)
    }

    pub fn resolved_value_placeholders(&self) -> PlaceholderTemplates {
        PlaceholderTemplates::default_value().merged_with(&self.value_placeholders)
    }
}

pub fn load_overlay_config() -> OverlayConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_overlay_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_overlay_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> OverlayConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return OverlayConfig::default(),
    };
    if !path.exists() {
        return OverlayConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            OverlayConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            OverlayConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
