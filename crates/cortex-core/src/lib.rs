//! cortex-core
//!
//! Pure domain types and storage key conventions.
//! No HTTP or template dependency; this is the shared vocabulary of the
//! Cortex prompt-to-preview pipeline.

pub mod error;
pub mod keys;
pub mod models;
