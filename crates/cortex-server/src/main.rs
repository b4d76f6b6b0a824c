use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cortex_preview::{PreviewAssets, PreviewRenderer};
use cortex_relay::PromptRelay;
use cortex_server::config::{LogFormat, StoreLocation};
use cortex_server::{AppState, ServerConfig};
use cortex_storage::{FileStore, MemoryStore, SessionStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let config = ServerConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    config.backend.validate()?;
    let relay = PromptRelay::new(&config.backend)?;
    let renderer = PreviewRenderer::new(PreviewAssets::default())?;

    let store: Arc<dyn SessionStore> = match &config.store {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::Directory(dir) => {
            tracing::info!(dir = %dir.display(), "using file session store");
            Arc::new(FileStore::new(dir.clone()))
        }
    };

    let backend = relay.backend().clone();
    let state = AppState::new(Arc::new(relay), Arc::new(renderer), store);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        backend = %backend.backend,
        endpoint = %backend.endpoint,
        model = %backend.model,
        "cortex server listening"
    );

    axum::serve(listener, cortex_server::app(state)).await?;
    Ok(())
}
