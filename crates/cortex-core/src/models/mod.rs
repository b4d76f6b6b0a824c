pub mod artifact;
pub mod chat;
pub mod runtime_error;
pub mod session;
