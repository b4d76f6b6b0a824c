use std::net::SocketAddr;
use std::path::PathBuf;

use cortex_relay::{Backend, BackendConfig};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Where session snapshots live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Start-up settings, read once from `CORTEX_*` environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub backend: BackendConfig,
    pub bind_addr: SocketAddr,
    pub store: StoreLocation,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend_kind: Backend = match var("CORTEX_BACKEND") {
            Some(name) => name.parse()?,
            None => Backend::default(),
        };
        let mut backend = BackendConfig::new(backend_kind);
        if let Some(url) = var("CORTEX_API_URL") {
            backend = backend.with_endpoint(url);
        }
        if let Some(key) = var("CORTEX_API_KEY") {
            backend = backend.with_api_key(key);
        }
        if let Some(model) = var("CORTEX_MODEL") {
            backend = backend.with_model(model);
        }

        let bind = var("CORTEX_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .map_err(|e| eyre::eyre!("invalid CORTEX_BIND_ADDR {bind:?}: {e}"))?;

        let store = match var("CORTEX_DATA_DIR") {
            Some(dir) if dir.eq_ignore_ascii_case("memory") => StoreLocation::Memory,
            Some(dir) => StoreLocation::Directory(PathBuf::from(dir)),
            None => StoreLocation::Directory(default_data_dir()?),
        };

        let log_format = match var("CORTEX_LOG_FORMAT").as_deref() {
            None | Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => eyre::bail!("unknown CORTEX_LOG_FORMAT {other:?} (expected json or pretty)"),
        };

        Ok(Self {
            backend,
            bind_addr,
            store,
            log_format,
        })
    }
}

fn default_data_dir() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("cortex"))
}
