//! cortex-preview
//!
//! Sandboxed preview documents for generated artifacts, and the typed
//! channel that carries runtime errors back out of the sandbox.

pub mod detect;
pub mod error;
pub mod panel;
pub mod relay;
pub mod render;

pub use panel::{PreviewPanel, PreviewState};
pub use relay::{ErrorLog, ErrorSender, PreviewMessage, error_channel, fix_errors_prompt};
pub use render::{PreviewAssets, PreviewDocument, PreviewRenderer};
