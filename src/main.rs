//! Replays a JSON interaction script against an in-memory editor and prints
//! the resulting document writes.

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use snow_overlay::config::{load_overlay_config, OverlayConfig};
use snow_overlay::document::{
    DocumentModel, ImageUploader, MemoryDocument, Mutation, Range, Source, UploadFile,
};
use snow_overlay::events::Emitter;
use snow_overlay::geometry::Point;
use snow_overlay::input::{ShortcutKey, ShortcutModifiers};
use snow_overlay::picker::PickerKind;
use snow_overlay::theme::{SnowTheme, Toolbar, ToolbarAction, ToolbarLayout};
use snow_overlay::tooltip::{SaveOutcome, TooltipState};

#[derive(Debug, Deserialize)]
struct Script {
    text: String,
    #[serde(default)]
    selection: Option<Range>,
    #[serde(default)]
    links: Vec<ScriptLink>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct ScriptLink {
    range: Range,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
enum Step {
    Select {
        index: usize,
        #[serde(default)]
        length: usize,
    },
    Blur,
    Toolbar {
        action: ToolbarAction,
    },
    SetLabel {
        value: String,
    },
    SetValue {
        value: String,
    },
    Key {
        key: ShortcutKey,
        #[serde(default)]
        modifiers: ShortcutModifiers,
    },
    Save,
    Cancel,
    Picker {
        format: String,
        option: usize,
    },
    PointerDown {
        x: i32,
        y: i32,
    },
    Upload {
        files: Vec<UploadFile>,
    },
    Tick,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    text: String,
    mutations: &'a [Mutation],
    saves: Vec<SaveOutcome>,
    tooltip: TooltipState,
}

fn main() -> anyhow::Result<()> {
    snow_overlay::logging::init();

    let Some(script_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: snow-overlay <script.json>");
    };
    let contents = std::fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read script {}", script_path.display()))?;
    let script: Script = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse script {}", script_path.display()))?;

    let config = load_overlay_config();
    let report = replay(config, script)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn replay(config: OverlayConfig, script: Script) -> anyhow::Result<serde_json::Value> {
    let mut doc = MemoryDocument::new(&script.text);
    for link in &script.links {
        doc = doc.with_link(link.range, &link.url);
    }
    if let Some(selection) = script.selection {
        doc = doc.with_selection(selection);
    }

    let mut emitter = Emitter::new();
    let mut theme = SnowTheme::try_new(config).context("failed to build snow theme")?;
    theme.extend_toolbar(Toolbar::from_layout(&ToolbarLayout::snow_default()), &mut emitter);
    tracing::info!(steps = script.steps.len(), "replaying script");

    let mut uploader = ImageUploader::default();
    let mut saves = Vec::new();
    for (position, step) in script.steps.into_iter().enumerate() {
        tracing::debug!(position, ?step, "replay step");
        match step {
            Step::Select { index, length } => {
                doc.set_selection(Range::new(index, length), Source::User);
            }
            Step::Blur => doc.blur(),
            Step::Toolbar { action } => theme.trigger(action, &mut doc),
            Step::SetLabel { value } => theme
                .tooltip_mut()
                .controller_mut()
                .label_mut()
                .set_value(value),
            Step::SetValue { value } => theme
                .tooltip_mut()
                .controller_mut()
                .value_mut()
                .set_value(value),
            Step::Key { key, modifiers } => {
                theme
                    .handle_key(key, modifiers, &mut doc)
                    .with_context(|| format!("key step {position} failed"))?;
            }
            Step::Save => {
                let outcome = theme
                    .save(&mut doc)
                    .with_context(|| format!("save step {position} failed"))?;
                saves.push(outcome);
            }
            Step::Cancel => theme
                .cancel(&mut doc)
                .with_context(|| format!("cancel step {position} failed"))?,
            Step::Picker { format, option } => {
                let kind = PickerKind::from_format(&format);
                let Some(id) = theme.pickers().find(&kind).map(|picker| picker.id()) else {
                    bail!("step {position}: toolbar has no {format} picker");
                };
                theme.toggle_picker(id);
                if theme.choose_picker(id, option, &mut doc).is_none() {
                    tracing::warn!(position, option, %format, "picker option out of range");
                }
            }
            Step::PointerDown { x, y } => {
                theme.pointer_down(Point::new(x, y), &doc);
            }
            Step::Upload { files } => {
                theme.upload_images(&mut uploader, &files, &mut doc);
            }
            Step::Tick => {
                theme.tick();
            }
        }
        let changes = doc.take_changes();
        emitter.emit_all(&changes, &doc);
    }

    let report = Report {
        text: doc.plain_text(),
        mutations: doc.mutations(),
        saves,
        tooltip: theme.tooltip().state(),
    };
    let value = serde_json::to_value(&report).context("failed to serialize replay report")?;
    theme.destroy(&mut emitter);
    Ok(value)
}
