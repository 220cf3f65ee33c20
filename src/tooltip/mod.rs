//! Floating tooltip for editing links, video embeds and formulas.

mod controller;
mod deferred;
mod embed;
mod field;
mod snow;
mod state;

use serde::{Deserialize, Serialize};

pub use controller::{
    EditOrigin, SaveOutcome, SkipReason, TooltipController, TooltipPlacement, TooltipState,
};
pub use deferred::{DeferredQueue, SessionId};
pub use embed::{normalize_embed_url, with_default_scheme};
pub use field::{InputField, PlaceholderTemplates, TooltipField};
pub use snow::SnowTooltip;
pub use state::{TooltipError, TooltipEvent, TooltipMachine, TooltipPhase, TooltipResult};

/// Format name the link branch writes.
pub const LINK_FORMAT: &str = "link";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipMode {
    Link,
    Video,
    Formula,
}

impl TooltipMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Video => "video",
            Self::Formula => "formula",
        }
    }
}
