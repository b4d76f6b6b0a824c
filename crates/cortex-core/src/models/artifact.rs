use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Title given to an artifact synthesized from an unparseable response.
pub const FALLBACK_TITLE: &str = "Generated Content";

/// Description given to an artifact synthesized from an unparseable response.
pub const FALLBACK_DESCRIPTION: &str = "Generated based on your request";

/// One generated app, as returned by the model.
///
/// This is the wire contract shared with the preview, the code viewer and
/// the download feature: `{type, code, title, description}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    pub code: String,
    pub title: String,
    pub description: String,
}

impl Artifact {
    /// Treat `raw` as a literal HTML document.
    ///
    /// Used when a model response cannot be decoded as an artifact object.
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            kind: ArtifactType::Html,
            code: raw.into(),
            title: FALLBACK_TITLE.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
        }
    }

    /// Chat line shown to the user once the artifact is ready.
    pub fn summary(&self) -> String {
        format!("Created: {}\n{}", self.title, self.description)
    }

    /// History line replayed to the model on later turns.
    pub fn history_note(&self) -> String {
        format!("Generated {} code: {}", self.kind, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ArtifactType {
    Html,
    React,
}

impl ArtifactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::Html => "html",
            ArtifactType::React => "react",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ArtifactType::Html),
            "react" => Ok(ArtifactType::React),
            other => Err(CoreError::InvalidArtifactType(other.to_string())),
        }
    }
}
