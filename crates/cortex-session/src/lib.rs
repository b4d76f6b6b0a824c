//! cortex-session
//!
//! One prompt-to-preview session: the chat transcript, the history replayed
//! to the model, the active artifact with its live preview, and the guard
//! that keeps a single generation in flight.

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{PendingTurn, PreviewSession};
