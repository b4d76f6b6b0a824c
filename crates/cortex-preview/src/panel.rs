use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use cortex_core::models::artifact::Artifact;
use cortex_core::models::runtime_error::RuntimeError;

use crate::error::PreviewError;
use crate::relay::{ErrorInbox, ErrorLog, ErrorSender, error_channel};
use crate::render::{PreviewDocument, PreviewRenderer};

/// `idle → loading → rendered`. Every new artifact re-enters from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewState {
    Idle,
    Loading,
    Rendered,
}

/// The live preview of one session: current document, lifecycle state and
/// the runtime errors reported by that document.
pub struct PreviewPanel {
    renderer: Arc<PreviewRenderer>,
    state: PreviewState,
    artifact: Option<Artifact>,
    document: Option<PreviewDocument>,
    errors: ErrorLog,
    sender: ErrorSender,
    inbox: ErrorInbox,
    refreshes: u64,
}

impl PreviewPanel {
    pub fn new(renderer: Arc<PreviewRenderer>) -> Self {
        let (sender, inbox) = error_channel();
        Self {
            renderer,
            state: PreviewState::Idle,
            artifact: None,
            document: None,
            errors: ErrorLog::new(),
            sender,
            inbox,
            refreshes: 0,
        }
    }

    /// Rebuild a panel from persisted parts.
    pub fn restore(
        renderer: Arc<PreviewRenderer>,
        artifact: Option<Artifact>,
        errors: Vec<RuntimeError>,
    ) -> Result<Self, PreviewError> {
        let mut panel = Self::new(renderer);
        if let Some(artifact) = artifact {
            panel.document = Some(panel.renderer.render(&artifact)?);
            panel.artifact = Some(artifact);
            panel.state = PreviewState::Rendered;
        }
        panel.errors = ErrorLog::from(errors);
        Ok(panel)
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn document(&self) -> Option<&PreviewDocument> {
        self.document.as_ref()
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// A handle the host uses to post messages coming out of the iframe.
    pub fn error_sender(&self) -> ErrorSender {
        self.sender.clone()
    }

    /// A generation has started.
    pub fn begin_loading(&mut self) {
        self.state = PreviewState::Loading;
    }

    /// The generation failed; go back to whatever was showing before.
    pub fn cancel_loading(&mut self) {
        self.state = if self.document.is_some() {
            PreviewState::Rendered
        } else {
            PreviewState::Idle
        };
    }

    /// Replace the active artifact and render it. Errors from the previous
    /// document, including any still in flight, are dropped.
    pub fn show(&mut self, artifact: Artifact) -> Result<&PreviewDocument, PreviewError> {
        let document = self.renderer.render(&artifact)?;
        self.inbox.drain();
        self.errors.clear();
        self.artifact = Some(artifact);
        self.state = PreviewState::Rendered;
        Ok(&*self.document.insert(document))
    }

    /// Manual refresh: rebuild the current document and clear errors.
    pub fn refresh(&mut self) -> Result<(), PreviewError> {
        self.inbox.drain();
        self.errors.clear();
        if let Some(artifact) = &self.artifact {
            self.document = Some(self.renderer.render(artifact)?);
            self.state = PreviewState::Rendered;
        }
        self.refreshes += 1;
        debug!(refreshes = self.refreshes, "preview refreshed");
        Ok(())
    }

    /// Record an error directly, bypassing the channel.
    pub fn report(&mut self, error: RuntimeError) {
        self.errors.push(error);
    }

    /// Errors recorded so far, oldest first. Envelopes still queued in the
    /// channel are not included until [`drain_errors`](Self::drain_errors).
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Move queued envelopes into the log and return it.
    pub fn drain_errors(&mut self) -> &ErrorLog {
        let pending = self.inbox.drain();
        self.errors.extend(pending);
        &self.errors
    }
}
