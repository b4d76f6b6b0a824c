//! cortex-relay
//!
//! Model invocation over HTTP and structured output extraction.

pub mod chat;
pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;

pub use chat::{Completion, PromptRelay, PromptRequest};
pub use client::{Backend, BackendConfig};
pub use error::RelayError;
pub use extract::extract_artifact;
