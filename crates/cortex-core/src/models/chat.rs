use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Status text shown while a generation is in flight.
pub const STATUS_WORKING: &str = "Working On Task";

/// Status text shown while a fix-errors prompt is being prepared.
pub const STATUS_FIXING: &str = "Fixing Errors";

/// A row in the visible chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Attached image as a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            image,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            image: None,
        }
    }

    pub fn status(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Status,
            content: content.into(),
            image: None,
        }
    }

    pub fn is_status(&self) -> bool {
        self.role == ChatRole::Status
    }
}

/// Role of a transcript row. `Status` rows are placeholders that disappear
/// once the pending response resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ChatRole {
    User,
    Assistant,
    Status,
}

/// One entry of the history replayed to the model on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image: Option<String>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            image,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}
