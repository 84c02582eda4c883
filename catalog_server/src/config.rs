use std::{env, time::Duration};

use catalog_backend::BackendConfig;
use catalog_common::{parse_boolean_flag, parse_env_or_default};
use catalog_engine::{catalog::DEFAULT_PAGE_SIZE, feed::DEFAULT_QUEUE_NAME};
use log::*;

const DEFAULT_CSE_HOST: &str = "127.0.0.1";
const DEFAULT_CSE_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog_store.db";
const DEFAULT_FEED_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// The queue in the `feed_messages` table that item updates are published to.
    pub feed_queue: String,
    /// How long the feed consumer waits before checking an empty queue again.
    pub feed_poll_interval: Duration,
    /// Page size for `GET /items` when the request does not give one.
    pub catalog_page_size: usize,
    /// If true, the store is not seeded from the backend at start-up.
    pub skip_bootstrap: bool,
    pub backend: BackendConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CSE_HOST.to_string(),
            port: DEFAULT_CSE_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            feed_queue: DEFAULT_QUEUE_NAME.to_string(),
            feed_poll_interval: DEFAULT_FEED_POLL_INTERVAL,
            catalog_page_size: DEFAULT_PAGE_SIZE,
            skip_bootstrap: false,
            backend: BackendConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let mut config = Self::from_lookup(|name| env::var(name).ok());
        config.backend = BackendConfig::new_from_env_or_default();
        config
    }

    /// Builds the server settings from a variable lookup. Invalid values are logged and replaced by their defaults.
    /// The backend settings are not read here.
    pub fn from_lookup<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let host = lookup("CSE_HOST").unwrap_or_else(|| DEFAULT_CSE_HOST.into());
        let port = parse_env_or_default(lookup("CSE_PORT"), DEFAULT_CSE_PORT, |s, e| {
            error!("🪛️ {s} is not a valid port for CSE_PORT. {e} Using the default, {DEFAULT_CSE_PORT}, instead.")
        });
        let database_url = lookup("CSE_DATABASE_URL").unwrap_or_else(|| {
            warn!("🪛️ CSE_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env_or_default(lookup("CSE_MAX_DB_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS, |s, e| {
            warn!("🪛️ Invalid value for CSE_MAX_DB_CONNECTIONS ({s}). {e}")
        });
        let feed_queue = lookup("CSE_FEED_QUEUE").unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string());
        let poll_ms = parse_env_or_default(
            lookup("CSE_FEED_POLL_INTERVAL_MS"),
            DEFAULT_FEED_POLL_INTERVAL.as_millis() as u64,
            |s, e| warn!("🪛️ Invalid value for CSE_FEED_POLL_INTERVAL_MS ({s}). {e}"),
        );
        let catalog_page_size = parse_env_or_default(lookup("CSE_CATALOG_PAGE_SIZE"), DEFAULT_PAGE_SIZE, |s, e| {
            warn!("🪛️ Invalid value for CSE_CATALOG_PAGE_SIZE ({s}). {e}")
        });
        if catalog_page_size == 0 {
            warn!("🪛️ CSE_CATALOG_PAGE_SIZE must be at least 1. Using {DEFAULT_PAGE_SIZE}");
        }
        let skip_bootstrap = parse_boolean_flag(lookup("CSE_SKIP_BOOTSTRAP"), false);
        Self {
            host,
            port,
            database_url,
            max_connections: max_connections.max(1),
            feed_queue,
            feed_poll_interval: Duration::from_millis(poll_ms.max(1)),
            catalog_page_size: if catalog_page_size == 0 { DEFAULT_PAGE_SIZE } else { catalog_page_size },
            skip_bootstrap,
            backend: BackendConfig::default(),
        }
    }
}
