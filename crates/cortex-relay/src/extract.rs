//! Artifact extraction from raw model output.
//!
//! Models are told to answer with a bare JSON object, but often wrap it in a
//! markdown fence or skip JSON entirely. Extraction never fails: anything
//! that cannot be decoded becomes a best-effort HTML artifact whose code is
//! the raw text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use cortex_core::models::artifact::{
    Artifact, ArtifactType, FALLBACK_DESCRIPTION, FALLBACK_TITLE,
};

/// A fenced block, optionally tagged `json`, holding an object. Greedy from
/// the first `{` to the last `}` before the closing fence.
static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("fence pattern is valid")
});

/// Decode an [`Artifact`] from model output.
///
/// 1. The whole text as JSON.
/// 2. The object inside a ```` ```json ```` (or bare ```` ``` ````) fence.
/// 3. Otherwise [`Artifact::fallback`] over the raw text, verbatim.
pub fn extract_artifact(raw: &str) -> Artifact {
    if let Some(artifact) = parse_object(raw.trim()) {
        return artifact;
    }

    if let Some(artifact) = FENCED_OBJECT
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_object(m.as_str()))
    {
        return artifact;
    }

    warn!(chars = raw.len(), "model output is not an artifact object, rendering as HTML");
    Artifact::fallback(raw)
}

fn parse_object(text: &str) -> Option<Artifact> {
    let value: Value = serde_json::from_str(text).ok()?;
    artifact_from_value(&value)
}

/// Build an artifact from a decoded object.
///
/// `code` must be a string. A missing or unrecognised `type` means `html`;
/// a missing `title` or `description` takes the fallback wording.
fn artifact_from_value(value: &Value) -> Option<Artifact> {
    let obj = value.as_object()?;
    let code = obj.get("code")?.as_str()?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<ArtifactType>().ok())
        .unwrap_or(ArtifactType::Html);

    let text_field = |name: &str, default: &str| {
        obj.get(name)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    Some(Artifact {
        kind,
        code: code.to_string(),
        title: text_field("title", FALLBACK_TITLE),
        description: text_field("description", FALLBACK_DESCRIPTION),
    })
}
