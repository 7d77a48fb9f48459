//! Client configuration

use std::path::PathBuf;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration for connecting to the backend API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:3000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory for persisted session tokens; `None` keeps tokens in memory
    pub storage_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new configuration with defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            storage_path: None,
        }
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Persist session tokens under the given directory.
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }
}
