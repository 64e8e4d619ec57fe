//! Client configuration

use crate::client::NetworkHttpClient;
use crate::error::ClientError;
use crate::session::SessionStore;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_DIR: &str = ".ihoms";
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Client configuration for connecting to the helpdesk backend
///
/// | Variable            | Default                     |
/// |---------------------|-----------------------------|
/// | `IHOMS_API_URL`     | `http://localhost:8000/api` |
/// | `IHOMS_TIMEOUT_SECS`| `30`                        |
/// | `IHOMS_SESSION_DIR` | `.ihoms`                    |
/// | `IHOMS_PAGE_SIZE`   | `10`                        |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (e.g., "http://localhost:8000/api")
    pub base_url: String,

    /// Request timeout in seconds. A request that exceeds it fails as a
    /// network error and releases its action's in-flight flag.
    pub timeout: u64,

    /// Directory holding the persisted session token
    pub session_dir: PathBuf,

    /// Default rows per page for list views
    pub page_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load from environment variables, falling back to defaults for
    /// anything unset or unparsable
    pub fn from_env() -> Self {
        let base_url = env::var("IHOMS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout = env::var("IHOMS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let session_dir = env::var("IHOMS_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR));
        let page_size = env::var("IHOMS_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            base_url,
            timeout,
            session_dir,
            page_size,
        }
    }

    /// Set the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the session directory
    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = dir.into();
        self
    }

    /// Set the default page size (0 is treated as 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Create a network HTTP client from this configuration
    pub fn build_http_client(&self) -> Result<NetworkHttpClient, ClientError> {
        NetworkHttpClient::new(&self.base_url, self.timeout_duration())
    }

    /// Token store under `session_dir`
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.session_dir)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
