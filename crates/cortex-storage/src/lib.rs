//! cortex-storage
//!
//! Session persistence behind a small trait, with an in-memory store and a
//! JSON-file store.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::SessionStore;
