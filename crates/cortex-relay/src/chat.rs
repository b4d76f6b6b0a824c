//! Chat-completion calls against the configured backend.
//!
//! Each call is a single best-effort round trip: no retries, no backoff and
//! no timeout beyond what the HTTP client itself applies.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cortex_core::models::chat::ConversationTurn;

use crate::client::{BackendConfig, ResolvedBackend};
use crate::error::RelayError;
use crate::prompt;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ── Types ────────────────────────────────────────────────────────────────────

/// One user turn to relay, with the history that precedes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    /// Optional image attached to this turn, as a data URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// A message in the outgoing request body.
///
/// Text-only backends take `{role, content}`; the gateway takes the
/// multimodal `{role, parts}` form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WireMessage {
    Text { role: String, content: String },
    Parts { role: String, parts: Vec<ContentPart> },
}

impl WireMessage {
    pub fn role(&self) -> &str {
        match self {
            WireMessage::Text { role, .. } | WireMessage::Parts { role, .. } => role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Response body. OpenAI-shaped backends answer with `choices`, Ollama's
/// native endpoint with a top-level `message`; either is accepted.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Completion seam ──────────────────────────────────────────────────────────

/// Anything that can turn a prompt into raw model text.
///
/// [`PromptRelay`] is the production implementation. Methods return boxed
/// futures for dyn compatibility.
pub trait Completion: Send + Sync {
    fn complete<'a>(&'a self, request: &'a PromptRequest)
    -> BoxFuture<'a, Result<String, RelayError>>;
}

// ── Relay ────────────────────────────────────────────────────────────────────

/// HTTP client bound to one validated backend.
#[derive(Debug, Clone)]
pub struct PromptRelay {
    http: reqwest::Client,
    backend: ResolvedBackend,
}

impl PromptRelay {
    /// Validate `config` and build the HTTP client. Fails with
    /// [`RelayError::Config`] before any network I/O.
    pub fn new(config: &BackendConfig) -> Result<Self, RelayError> {
        let backend = config.resolve()?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("cortex-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;
        Ok(Self { http, backend })
    }

    pub fn backend(&self) -> &ResolvedBackend {
        &self.backend
    }

    /// Send one prompt and return the model's text.
    pub async fn relay(&self, request: &PromptRequest) -> Result<String, RelayError> {
        let messages = prompt::build_messages(self.backend.backend, request);
        let body = ChatRequest {
            model: &self.backend.model,
            messages: &messages,
            stream: (!self.backend.backend.supports_images()).then_some(false),
        };

        info!(
            backend = %self.backend.backend,
            endpoint = %self.backend.endpoint,
            model = %self.backend.model,
            messages = messages.len(),
            "relaying prompt"
        );

        let mut req = self.http.post(&self.backend.endpoint).json(&body);
        if let Some(token) = &self.backend.bearer {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "AI backend rejected request");
            return Err(RelayError::from_status(status.as_u16(), text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let content = decode_content(&text)?;
        info!(chars = content.len(), "AI backend responded");
        Ok(content)
    }
}

impl Completion for PromptRelay {
    fn complete<'a>(
        &'a self,
        request: &'a PromptRequest,
    ) -> BoxFuture<'a, Result<String, RelayError>> {
        Box::pin(self.relay(request))
    }
}

/// Pull the assistant text out of a completion body.
fn decode_content(body: &str) -> Result<String, RelayError> {
    if body.trim().is_empty() {
        return Err(RelayError::EmptyResponse);
    }

    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| RelayError::ResponseParse(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .or(parsed.message)
        .and_then(|m| m.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(RelayError::EmptyResponse)?;

    Ok(content)
}
