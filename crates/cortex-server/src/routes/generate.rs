use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use cortex_core::models::artifact::Artifact;
use cortex_core::models::chat::ConversationTurn;
use cortex_relay::{PromptRequest, extract_artifact};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Stateless generation: relay one prompt with caller-supplied history and
/// return the extracted artifact.
pub async fn generate_code(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<Artifact>, ApiError> {
    let image = body.image.filter(|i| !i.trim().is_empty());
    if body.prompt.trim().is_empty() && image.is_none() {
        return Err(ApiError::BadRequest("a prompt or an image is required".to_string()));
    }

    let request = PromptRequest {
        prompt: body.prompt,
        history: body.conversation_history,
        image,
    };
    let raw = state.relay.complete(&request).await?;
    Ok(Json(extract_artifact(&raw)))
}
