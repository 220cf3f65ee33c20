pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod geometry;
pub mod icons;
pub mod input;
pub mod logging;
pub mod picker;
pub mod theme;
pub mod tooltip;
pub use error::{OverlayError, OverlayResult};
pub use theme::SnowTheme;
