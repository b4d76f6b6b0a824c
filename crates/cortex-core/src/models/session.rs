use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::artifact::Artifact;
use super::chat::{ChatMessage, ConversationTurn};
use super::runtime_error::RuntimeError;

/// Persisted snapshot of one preview session.
///
/// Holds everything needed to rebuild the session after a restart: the
/// visible transcript, the history replayed to the model, the active
/// artifact and any runtime errors not yet resolved.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRecord {
    pub id: Uuid,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    #[serde(default)]
    pub artifact: Option<Artifact>,
    #[serde(default)]
    pub errors: Vec<RuntimeError>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl SessionRecord {
    pub fn new(id: Uuid) -> Self {
        let now = jiff::Timestamp::now();
        Self {
            id,
            messages: Vec::new(),
            history: Vec::new(),
            artifact: None,
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
