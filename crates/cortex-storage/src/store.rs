use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use cortex_core::models::session::SessionRecord;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence for session snapshots.
///
/// Methods return boxed futures for dyn compatibility, so a host can hold an
/// `Arc<dyn SessionStore>` and swap the backing store by configuration.
pub trait SessionStore: Send + Sync {
    /// Load a session. Returns [`StorageError::NotFound`] if it was never saved.
    fn load(&self, id: Uuid) -> BoxFuture<'_, Result<SessionRecord, StorageError>>;

    /// Insert or overwrite a session.
    fn save<'a>(&'a self, record: &'a SessionRecord) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Remove a session. Removing an unknown session is a no-op.
    fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>>;

    /// Ids of every stored session, in no particular order.
    fn list(&self) -> BoxFuture<'_, Result<Vec<Uuid>, StorageError>>;
}
