use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use cortex_core::models::session::SessionRecord;

use crate::error::StorageError;
use crate::store::{BoxFuture, SessionStore};

/// Process-local store. Sessions vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<Uuid, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: Uuid) -> BoxFuture<'_, Result<SessionRecord, StorageError>> {
        Box::pin(async move {
            self.sessions
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound { id })
        })
    }

    fn save<'a>(&'a self, record: &'a SessionRecord) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.sessions.write().await.insert(record.id, record.clone());
            Ok(())
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            self.sessions.write().await.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Uuid>, StorageError>> {
        Box::pin(async move { Ok(self.sessions.read().await.keys().copied().collect()) })
    }
}
