//! Client configuration.

use std::time::Duration;

use academy_core::ApiUrl;

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api: ApiUrl,
    /// Per-request timeout, covering connect through the end of the body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            timeout: Self::DEFAULT_TIMEOUT,
            user_agent: concat!("academy/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(ApiUrl::default())
    }
}
