use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use cortex_preview::PreviewRenderer;
use cortex_relay::Completion;
use cortex_session::PreviewSession;
use cortex_storage::SessionStore;

use crate::error::ApiError;

pub type SharedSession = Arc<Mutex<PreviewSession>>;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<dyn Completion>,
    pub renderer: Arc<PreviewRenderer>,
    pub store: Arc<dyn SessionStore>,
    /// Sessions touched since start-up. Anything else is loaded from the
    /// store on first use. Entries leave only on DELETE, so the map grows
    /// with the number of sessions used during the process lifetime.
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl AppState {
    pub fn new(
        relay: Arc<dyn Completion>,
        renderer: Arc<PreviewRenderer>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            relay,
            renderer,
            store,
            sessions: Arc::default(),
        }
    }

    /// Create and persist an empty session.
    pub async fn create_session(&self) -> Result<SharedSession, ApiError> {
        let session = PreviewSession::new(Uuid::new_v4(), self.renderer.clone());
        self.store.save(&session.snapshot()).await?;

        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, shared.clone());
        tracing::info!(session = %id, "session created");
        Ok(shared)
    }

    /// Look a session up, restoring it from the store if needed.
    pub async fn session(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        if let Some(shared) = self.sessions.read().await.get(&id) {
            return Ok(shared.clone());
        }

        let record = self.store.load(id).await?;
        let session = PreviewSession::restore(record, self.renderer.clone())?;
        tracing::debug!(session = %id, "session restored from store");

        let mut sessions = self.sessions.write().await;
        let shared = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(session)));
        Ok(shared.clone())
    }

    pub async fn persist(&self, session: &PreviewSession) -> Result<(), ApiError> {
        self.store.save(&session.snapshot()).await?;
        Ok(())
    }

    /// Whether `shared` is still the registered session for its id. A
    /// session deleted while a handler held it is no longer registered.
    pub async fn is_registered(&self, id: Uuid, shared: &SharedSession) -> bool {
        self.sessions
            .read()
            .await
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, shared))
    }

    /// Forget a session and its snapshot. Refused while a turn is running.
    pub async fn remove_session(&self, id: Uuid) -> Result<(), ApiError> {
        let shared = self.sessions.read().await.get(&id).cloned();
        let Some(shared) = shared else {
            self.store.delete(id).await?;
            return Ok(());
        };

        let session = shared.lock().await;
        if session.is_generating() {
            return Err(ApiError::Conflict(format!(
                "session {id} is generating and cannot be deleted"
            )));
        }
        self.sessions.write().await.remove(&id);
        self.store.delete(id).await?;
        drop(session);

        tracing::info!(session = %id, "session deleted");
        Ok(())
    }
}
