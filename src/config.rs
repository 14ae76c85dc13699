//! Client configuration.
//!
//! The backend endpoint is the only environment-driven setting.

/// Backend used when `MATJIP_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "MATJIP_BACKEND_URL";

/// Which backend endpoint answers queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// `POST /query/stream`, server-sent events
    #[default]
    Streaming,
    /// `POST /query`, one JSON object
    Legacy,
}

/// Configuration for [`crate::app::ChatApp`].
///
/// # Example
///
/// ```ignore
/// use matjip::config::{ClientConfig, Transport};
///
/// let config = ClientConfig::from_env().with_transport(Transport::Legacy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub backend_url: String,
    pub transport: Transport,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            transport: Transport::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. Trailing slashes are dropped.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Defaults, with the backend URL taken from `MATJIP_BACKEND_URL` when set
    /// and non-blank.
    pub fn from_env() -> Self {
        match std::env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_backend_url(url.trim()),
            _ => Self::default(),
        }
    }
}
