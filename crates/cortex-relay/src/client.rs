//! Backend selection and validation.
//!
//! A backend is one of three wire dialects the relay knows how to speak:
//!
//! - **gateway**: a metered, OpenAI-compatible hosted gateway. Messages use
//!   the multimodal `parts` form so images can be attached. A bearer key is
//!   mandatory.
//! - **ollama**: Ollama's native `/api/chat` endpoint. Text only. The
//!   default endpoint is the local daemon, which needs no key; any other
//!   endpoint is treated as remote and must be given one.
//! - **local**: an OpenAI-compatible server on the user's machine. The base
//!   URL is mandatory and `/v1/chat/completions` is appended to it.
//!
//! Validation happens before any I/O.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

pub const GATEWAY_ENDPOINT: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const GATEWAY_MODEL: &str = "google/gemini-2.5-flash";

pub const OLLAMA_LOCAL_ENDPOINT: &str = "http://localhost:11434/api/chat";
pub const OLLAMA_MODEL: &str = "llama3";

pub const LOCAL_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const LOCAL_MODEL: &str = "qwen2.5-coder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Gateway,
    Ollama,
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Gateway => "gateway",
            Backend::Ollama => "ollama",
            Backend::Local => "local",
        }
    }

    /// Whether this dialect carries image attachments.
    pub fn supports_images(&self) -> bool {
        matches!(self, Backend::Gateway)
    }

    fn default_model(&self) -> &'static str {
        match self {
            Backend::Gateway => GATEWAY_MODEL,
            Backend::Ollama => OLLAMA_MODEL,
            Backend::Local => LOCAL_MODEL,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gateway" => Ok(Backend::Gateway),
            "ollama" => Ok(Backend::Ollama),
            "local" => Ok(Backend::Local),
            other => Err(RelayError::Config(format!(
                "unknown backend {other:?} (expected gateway, ollama or local)"
            ))),
        }
    }
}

/// Backend settings as supplied by the operator. Unset fields fall back to
/// the backend's defaults during [`BackendConfig::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub backend: Backend,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// A validated backend: concrete endpoint, model and auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackend {
    pub backend: Backend,
    pub endpoint: String,
    pub model: String,
    /// Bearer token to attach, if the backend wants one.
    pub bearer: Option<String>,
}

impl BackendConfig {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Check the settings without building anything.
    pub fn validate(&self) -> Result<(), RelayError> {
        self.resolve().map(|_| ())
    }

    /// Validate the settings and fill in defaults.
    pub fn resolve(&self) -> Result<ResolvedBackend, RelayError> {
        let api_key = non_blank(self.api_key.as_deref());
        let endpoint = non_blank(self.endpoint.as_deref());
        let model = non_blank(self.model.as_deref())
            .unwrap_or_else(|| self.backend.default_model().to_string());

        let (endpoint, bearer) = match self.backend {
            Backend::Gateway => {
                let key = api_key.ok_or_else(|| {
                    RelayError::Config("an API key is required for the gateway backend".into())
                })?;
                (endpoint.unwrap_or_else(|| GATEWAY_ENDPOINT.to_string()), Some(key))
            }
            Backend::Ollama => {
                let endpoint = endpoint.unwrap_or_else(|| OLLAMA_LOCAL_ENDPOINT.to_string());
                let is_local = endpoint == OLLAMA_LOCAL_ENDPOINT;
                if !is_local && api_key.is_none() {
                    return Err(RelayError::Config(
                        "an API key is required for a remote Ollama endpoint".into(),
                    ));
                }
                // The local daemon never sees the key, even if one is set.
                let bearer = if is_local { None } else { api_key };
                (endpoint, bearer)
            }
            Backend::Local => {
                let base = endpoint.ok_or_else(|| {
                    RelayError::Config(
                        "a base URL is required for the local backend (e.g. http://localhost:11434)"
                            .into(),
                    )
                })?;
                (local_completions_url(&base), api_key)
            }
        };

        reqwest::Url::parse(&endpoint)
            .map_err(|e| RelayError::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;

        Ok(ResolvedBackend {
            backend: self.backend,
            endpoint,
            model,
            bearer,
        })
    }
}

/// Append the OpenAI completions path to a base URL unless it is already there.
fn local_completions_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(LOCAL_COMPLETIONS_PATH) {
        base.to_string()
    } else {
        format!("{base}{LOCAL_COMPLETIONS_PATH}")
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
