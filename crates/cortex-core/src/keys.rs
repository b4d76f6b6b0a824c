//! Storage key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! whatever backs a session store (a directory tree or an object bucket).

use uuid::Uuid;

pub const SESSIONS_PREFIX: &str = "sessions/";

pub fn session(id: Uuid) -> String {
    format!("sessions/{id}.json")
}

/// Parse a session id back out of a key produced by [`session`].
pub fn session_id(key: &str) -> Option<Uuid> {
    key.strip_prefix(SESSIONS_PREFIX)
        .and_then(|rest| rest.strip_suffix(".json"))
        .and_then(|id| id.parse().ok())
}
