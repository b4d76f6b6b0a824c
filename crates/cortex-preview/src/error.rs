use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("malformed preview message: {0}")]
    Envelope(#[from] serde_json::Error),
}

impl From<tera::Error> for PreviewError {
    fn from(e: tera::Error) -> Self {
        PreviewError::TemplateRender(e.to_string())
    }
}
