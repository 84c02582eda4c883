use std::time::Duration;

use catalog_common::{parse_env_or_default, Secret};
use log::*;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://admin.internal:8080`. Paths are appended to this verbatim.
    pub base_url: String,
    pub api_key: Secret<String>,
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            api_key: Secret::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self { base_url: base_url.to_string(), api_key: Secret::new(api_key.to_string()), ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("CSE_BACKEND_URL").unwrap_or_else(|_| {
            warn!("🪛️ CSE_BACKEND_URL not set, using {DEFAULT_BACKEND_URL} as default");
            DEFAULT_BACKEND_URL.to_string()
        });
        let api_key = Secret::new(std::env::var("CSE_BACKEND_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ CSE_BACKEND_API_KEY not set. Requests to the backend will probably be rejected.");
            String::default()
        }));
        let timeout_secs = parse_env_or_default(
            std::env::var("CSE_BACKEND_TIMEOUT_SECS").ok(),
            DEFAULT_REQUEST_TIMEOUT.as_secs(),
            |s, e| warn!("🪛️ Invalid value for CSE_BACKEND_TIMEOUT_SECS ({s}). {e}"),
        );
        Self { base_url, api_key, request_timeout: Duration::from_secs(timeout_secs) }
    }
}
