use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Html;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cortex_core::models::artifact::Artifact;
use cortex_core::models::session::SessionRecord;
use cortex_preview::{PreviewMessage, PreviewState};
use cortex_session::{PendingTurn, PreviewSession, SessionError};

use crate::error::ApiError;
use crate::state::{AppState, SharedSession};

#[derive(Debug, Serialize)]
pub struct CreatedSession {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub generating: bool,
    pub preview: PreviewState,
}

#[derive(Debug, Deserialize)]
pub struct PromptBody {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub image: Option<String>,
}

pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<Uuid>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreatedSession>), ApiError> {
    let session = state.create_session().await?;
    let id = session.lock().await.id();
    Ok((StatusCode::CREATED, Json(CreatedSession { id })))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session.drain_errors();
    Ok(Json(SessionView {
        record: session.snapshot(),
        generating: session.is_generating(),
        preview: session.preview_state(),
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_prompt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PromptBody>,
) -> Result<Json<Artifact>, ApiError> {
    let session = state.session(id).await?;
    let artifact = drive_turn(state, session, move |s| s.begin_turn(body.prompt, body.image)).await?;
    Ok(Json(artifact))
}

pub async fn fix_errors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Artifact>, ApiError> {
    let session = state.session(id).await?;
    let artifact = drive_turn(state, session, PreviewSession::begin_fix).await?;
    Ok(Json(artifact))
}

/// Accept a `{type: "CONSOLE_ERROR", message}` envelope from the preview.
/// Other message types are accepted and dropped.
pub async fn report_error(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(message): Json<PreviewMessage>,
) -> Result<StatusCode, ApiError> {
    let session = state.session(id).await?;
    let sender = session.lock().await.error_sender();
    sender.post(message);
    Ok(StatusCode::ACCEPTED)
}

pub async fn refresh(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;
    session.refresh()?;
    state.persist(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Host page embedding the sandboxed preview and its error bridge.
pub async fn preview_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let session = state.session(id).await?;
    let session = session.lock().await;
    let document = session
        .document()
        .ok_or_else(|| ApiError::NotFound(format!("session {id} has nothing to preview yet")))?;
    let page = state
        .renderer
        .render_host_page(document, &format!("/sessions/{id}/errors"))?;
    Ok(Html(page))
}

/// CSP applied to the bare document so that opening it directly gets the
/// same isolation as the iframe: scripts run, but in an opaque origin.
pub const DOCUMENT_CSP: &str = "sandbox allow-scripts";

/// The bare preview document, as loaded into the iframe.
pub async fn preview_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<([(header::HeaderName, &'static str); 1], Html<String>), ApiError> {
    let session = state.session(id).await?;
    let session = session.lock().await;
    let document = session
        .document()
        .ok_or_else(|| ApiError::NotFound(format!("session {id} has nothing to preview yet")))?;
    Ok((
        [(header::CONTENT_SECURITY_POLICY, DOCUMENT_CSP)],
        Html(document.html.clone()),
    ))
}

/// Run one turn without holding the session lock across the model call.
///
/// The turn runs on its own task so a dropped client connection cannot
/// leave the session stuck in its generating state. The outcome is applied
/// in memory first; a failed save is logged and does not turn a completed
/// generation into an error. A session deleted mid-turn is not saved back.
async fn drive_turn<F>(state: AppState, session: SharedSession, begin: F) -> Result<Artifact, ApiError>
where
    F: FnOnce(&mut PreviewSession) -> Result<PendingTurn, SessionError> + Send + 'static,
{
    let task = tokio::spawn(async move {
        let pending = begin(&mut *session.lock().await)?;
        let outcome = state.relay.complete(pending.request()).await;

        let mut guard = session.lock().await;
        let id = guard.id();
        let result = guard.complete_turn(pending, outcome);
        if state.is_registered(id, &session).await {
            if let Err(e) = state.persist(&guard).await {
                tracing::error!(session = %id, error = ?e, "failed to save session after turn");
            }
        } else {
            tracing::info!(session = %id, "session deleted during turn, not saving");
        }
        Ok::<_, ApiError>(result?)
    });

    task.await
        .map_err(|e| ApiError::Internal(format!("generation task failed: {e}")))?
}
