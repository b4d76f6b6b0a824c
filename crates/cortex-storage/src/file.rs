use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use cortex_core::keys;
use cortex_core::models::session::SessionRecord;

use crate::error::StorageError;
use crate::store::{BoxFuture, SessionStore};

/// Stores each session as pretty-printed JSON under `{root}/sessions/`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(keys::session(id))
    }
}

impl SessionStore for FileStore {
    fn load(&self, id: Uuid) -> BoxFuture<'_, Result<SessionRecord, StorageError>> {
        Box::pin(async move {
            let path = self.path_for(id);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(StorageError::NotFound { id });
                }
                Err(e) => return Err(e.into()),
            };
            let record: SessionRecord = serde_json::from_slice(&bytes)?;
            tracing::debug!(path = %path.display(), "session loaded");
            Ok(record)
        })
    }

    fn save<'a>(&'a self, record: &'a SessionRecord) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let path = self.path_for(record.id);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            // Temp file then rename.
            let json = serde_json::to_vec_pretty(record)?;
            let tmp_path = path.with_extension("json.tmp");
            tokio::fs::write(&tmp_path, &json).await?;
            tokio::fs::rename(&tmp_path, &path).await?;

            tracing::debug!(path = %path.display(), "session saved");
            Ok(())
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let path = self.path_for(id);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "session deleted");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Uuid>, StorageError>> {
        Box::pin(async move {
            let dir = self.root.join(keys::SESSIONS_PREFIX);
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };

            let mut ids = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                let key = format!("{}{}", keys::SESSIONS_PREFIX, name.to_string_lossy());
                if let Some(id) = keys::session_id(&key) {
                    ids.push(id);
                }
            }
            Ok(ids)
        })
    }
}
