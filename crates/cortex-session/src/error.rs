use thiserror::Error;

use cortex_preview::error::PreviewError;
use cortex_relay::RelayError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a prompt or an image is required")]
    EmptyPrompt,

    #[error("a generation is already in progress")]
    Busy,

    #[error("no runtime errors to fix")]
    NoErrors,

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("preview error: {0}")]
    Preview(#[from] PreviewError),
}
