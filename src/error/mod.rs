use crate::icons::IconError;
use crate::tooltip::TooltipError;
use thiserror::Error;

pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error(transparent)]
    Tooltip(#[from] TooltipError),
    #[error(transparent)]
    Icons(#[from] IconError),
}
