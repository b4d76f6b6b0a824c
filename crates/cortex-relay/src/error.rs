use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to your workspace.")]
    CreditsExhausted,

    #[error("AI backend error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("AI backend returned an empty response")]
    EmptyResponse,

    #[error("response parsing failed: {0}")]
    ResponseParse(String),
}

impl RelayError {
    /// Classify a non-success HTTP status returned by the backend.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => RelayError::RateLimited,
            402 => RelayError::CreditsExhausted,
            _ => RelayError::Status { status, body },
        }
    }
}
