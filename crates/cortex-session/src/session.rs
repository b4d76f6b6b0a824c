use std::sync::Arc;

use jiff::Timestamp;
use tracing::{info, warn};
use uuid::Uuid;

use cortex_core::models::artifact::Artifact;
use cortex_core::models::chat::{ChatMessage, ConversationTurn, STATUS_FIXING, STATUS_WORKING};
use cortex_core::models::runtime_error::RuntimeError;
use cortex_core::models::session::SessionRecord;
use cortex_preview::{ErrorSender, PreviewDocument, PreviewPanel, PreviewRenderer, PreviewState};
use cortex_relay::{Completion, PromptRequest, RelayError, extract_artifact};

use crate::error::SessionError;

/// A turn that has been accepted and is waiting for the model.
///
/// Produced by [`PreviewSession::begin_turn`]; hand it back to
/// [`PreviewSession::complete_turn`] together with the relay outcome.
#[derive(Debug, Clone)]
#[must_use = "a pending turn keeps the session busy until it is completed"]
pub struct PendingTurn {
    request: PromptRequest,
}

impl PendingTurn {
    /// The request to relay. Its history stops before this turn.
    pub fn request(&self) -> &PromptRequest {
        &self.request
    }
}

/// An explicit, single-owner session.
///
/// Not thread-safe on its own; a host that serves several clients wraps
/// each session in a mutex and uses the split
/// [`begin_turn`](Self::begin_turn) / [`complete_turn`](Self::complete_turn)
/// form so the lock is not held across the model call.
pub struct PreviewSession {
    id: Uuid,
    messages: Vec<ChatMessage>,
    history: Vec<ConversationTurn>,
    panel: PreviewPanel,
    generating: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl PreviewSession {
    pub fn new(id: Uuid, renderer: Arc<PreviewRenderer>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            messages: Vec::new(),
            history: Vec::new(),
            panel: PreviewPanel::new(renderer),
            generating: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a session from a stored snapshot. Leftover status rows from
    /// an interrupted turn are dropped.
    pub fn restore(
        record: SessionRecord,
        renderer: Arc<PreviewRenderer>,
    ) -> Result<Self, SessionError> {
        let panel = PreviewPanel::restore(renderer, record.artifact, record.errors)?;
        let mut messages = record.messages;
        messages.retain(|m| !m.is_status());
        Ok(Self {
            id: record.id,
            messages,
            history: record.history,
            panel,
            generating: false,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.panel.artifact()
    }

    pub fn document(&self) -> Option<&PreviewDocument> {
        self.panel.document()
    }

    pub fn preview_state(&self) -> PreviewState {
        self.panel.state()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ── Turns ────────────────────────────────────────────────────────────────

    /// Accept a prompt and mark the session busy.
    ///
    /// Pushes the user row and a "Working On Task" status row and puts the
    /// preview into its loading state. The returned turn carries the history
    /// as it stood before this prompt.
    pub fn begin_turn(
        &mut self,
        prompt: impl Into<String>,
        image: Option<String>,
    ) -> Result<PendingTurn, SessionError> {
        let prompt = prompt.into();
        let image = image.filter(|i| !i.trim().is_empty());
        if prompt.trim().is_empty() && image.is_none() {
            return Err(SessionError::EmptyPrompt);
        }
        if self.generating {
            return Err(SessionError::Busy);
        }

        self.generating = true;
        self.messages.push(ChatMessage::user(prompt.clone(), image.clone()));
        self.messages.push(ChatMessage::status(STATUS_WORKING));
        self.panel.begin_loading();
        self.touch();

        Ok(PendingTurn {
            request: PromptRequest {
                prompt,
                history: self.history.clone(),
                image,
            },
        })
    }

    /// Apply the relay outcome of a pending turn.
    ///
    /// Status rows are removed and the busy flag is cleared whatever the
    /// outcome. On success the response is extracted, recorded in the
    /// transcript and history, and shown in the preview. On failure the
    /// history is left untouched and the preview returns to what it showed
    /// before.
    pub fn complete_turn(
        &mut self,
        pending: PendingTurn,
        outcome: Result<String, RelayError>,
    ) -> Result<Artifact, SessionError> {
        self.generating = false;
        self.messages.retain(|m| !m.is_status());
        self.touch();

        let raw = match outcome {
            Ok(raw) => raw,
            Err(e) => {
                warn!(session = %self.id, error = %e, "generation failed");
                self.panel.cancel_loading();
                return Err(e.into());
            }
        };

        let artifact = extract_artifact(&raw);
        if let Err(e) = self.panel.show(artifact.clone()) {
            self.panel.cancel_loading();
            return Err(e.into());
        }

        let PromptRequest { prompt, image, .. } = pending.request;
        self.messages.push(ChatMessage::assistant(artifact.summary()));
        self.history.push(ConversationTurn::user(prompt, image));
        self.history.push(ConversationTurn::assistant(artifact.history_note()));

        info!(
            session = %self.id,
            kind = %artifact.kind,
            title = %artifact.title,
            turns = self.history.len(),
            "artifact generated"
        );
        Ok(artifact)
    }

    /// Relay one prompt and apply the result.
    pub async fn submit(
        &mut self,
        completion: &dyn Completion,
        prompt: impl Into<String>,
        image: Option<String>,
    ) -> Result<Artifact, SessionError> {
        let pending = self.begin_turn(prompt, image)?;
        let outcome = completion.complete(pending.request()).await;
        self.complete_turn(pending, outcome)
    }

    /// Start a turn that asks the model to fix the collected runtime errors.
    pub fn begin_fix(&mut self) -> Result<PendingTurn, SessionError> {
        if self.generating {
            return Err(SessionError::Busy);
        }
        let prompt = self.panel.drain_errors().fix_prompt().ok_or(SessionError::NoErrors)?;
        self.messages.push(ChatMessage::status(STATUS_FIXING));
        self.begin_turn(prompt, None)
    }

    /// Resubmit the collected runtime errors as a new prompt.
    pub async fn fix_errors(&mut self, completion: &dyn Completion) -> Result<Artifact, SessionError> {
        let pending = self.begin_fix()?;
        let outcome = completion.complete(pending.request()).await;
        self.complete_turn(pending, outcome)
    }

    // ── Preview ──────────────────────────────────────────────────────────────

    /// Sender for envelopes coming out of this session's preview.
    pub fn error_sender(&self) -> ErrorSender {
        self.panel.error_sender()
    }

    pub fn report_error(&mut self, error: RuntimeError) {
        self.panel.report(error);
        self.touch();
    }

    /// Runtime errors recorded for the current preview, oldest first.
    pub fn errors(&self) -> &[RuntimeError] {
        self.panel.errors().as_slice()
    }

    /// Pull queued envelopes from the preview channel into the error log.
    pub fn drain_errors(&mut self) -> &[RuntimeError] {
        self.panel.drain_errors().as_slice()
    }

    /// Clear errors and rebuild the preview document.
    pub fn refresh(&mut self) -> Result<(), SessionError> {
        self.panel.refresh()?;
        self.touch();
        Ok(())
    }

    /// Everything needed to rebuild this session later. Call
    /// [`drain_errors`](Self::drain_errors) first to include queued envelopes.
    pub fn snapshot(&self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            messages: self.messages.clone(),
            history: self.history.clone(),
            artifact: self.panel.artifact().cloned(),
            errors: self.errors().to_vec(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
