//! Runtime error channel between the sandboxed preview and its host.
//!
//! Inside the iframe, listeners for `error` and `unhandledrejection` post a
//! `{type: "CONSOLE_ERROR", message}` envelope to the parent window. On the
//! host side the envelope is decoded into a [`PreviewMessage`], sent through
//! an [`ErrorSender`], and drained into an [`ErrorLog`] owned by the preview
//! panel.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use cortex_core::models::runtime_error::RuntimeError;

use crate::error::PreviewError;

/// Prefix of the follow-up prompt built from collected errors.
pub const FIX_ERRORS_PREFIX: &str = "Fix these errors in the code:";

/// A message posted by the preview to its parent window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreviewMessage {
    #[serde(rename = "CONSOLE_ERROR")]
    ConsoleError { message: String },
    /// Any other `type`. Ignored by the host.
    #[serde(other)]
    Other,
}

impl PreviewMessage {
    pub fn console_error(message: impl Into<String>) -> Self {
        PreviewMessage::ConsoleError {
            message: message.into(),
        }
    }
}

/// Create a connected sender/inbox pair.
pub fn error_channel() -> (ErrorSender, ErrorInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ErrorSender { tx }, ErrorInbox { rx })
}

/// Posting side of the channel. Cheap to clone; never blocks.
#[derive(Debug, Clone)]
pub struct ErrorSender {
    tx: mpsc::UnboundedSender<RuntimeError>,
}

impl ErrorSender {
    /// Forward a message. Returns `true` if it was a console error and the
    /// inbox is still alive.
    pub fn post(&self, message: PreviewMessage) -> bool {
        match message {
            PreviewMessage::ConsoleError { message } => {
                self.tx.send(RuntimeError::new(message)).is_ok()
            }
            PreviewMessage::Other => {
                debug!("ignoring non-error preview message");
                false
            }
        }
    }

    /// Decode a raw JSON envelope and forward it.
    pub fn post_json(&self, raw: &str) -> Result<bool, PreviewError> {
        let message: PreviewMessage = serde_json::from_str(raw)?;
        Ok(self.post(message))
    }
}

/// Receiving side of the channel.
#[derive(Debug)]
pub struct ErrorInbox {
    rx: mpsc::UnboundedReceiver<RuntimeError>,
}

impl ErrorInbox {
    /// Take every error posted so far without waiting.
    pub fn drain(&mut self) -> Vec<RuntimeError> {
        let mut out = Vec::new();
        while let Ok(error) = self.rx.try_recv() {
            out.push(error);
        }
        out
    }
}

/// Errors collected from the current preview document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    errors: Vec<RuntimeError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: RuntimeError) {
        self.errors.push(error);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn as_slice(&self) -> &[RuntimeError] {
        &self.errors
    }

    /// The follow-up prompt for these errors, or `None` if there are none.
    pub fn fix_prompt(&self) -> Option<String> {
        (!self.errors.is_empty()).then(|| fix_errors_prompt(&self.errors))
    }
}

impl Extend<RuntimeError> for ErrorLog {
    fn extend<I: IntoIterator<Item = RuntimeError>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl From<Vec<RuntimeError>> for ErrorLog {
    fn from(errors: Vec<RuntimeError>) -> Self {
        Self { errors }
    }
}

/// `Fix these errors in the code:` followed by one message per line.
pub fn fix_errors_prompt(errors: &[RuntimeError]) -> String {
    let summary = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("{FIX_ERRORS_PREFIX}\n{summary}")
}
