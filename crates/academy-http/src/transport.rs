//! HTTP transport with a cookie jar as the ambient credential.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use tracing::{debug, instrument, trace};

use academy_core::error::TransportError;
use academy_core::wire::{self, ApiRequest, ApiResponse, Method};
use academy_core::{ApiUrl, Error, Result, Transport};

use crate::config::ClientConfig;

/// Endpoints whose cookies make up the persisted credential.
const CREDENTIAL_ENDPOINTS: [&str; 3] = [wire::WHO_AM_I, wire::REFRESH, wire::LOGOUT];

/// A [`Transport`] over reqwest.
///
/// Cookies set by the service are kept in an in-memory jar and attached
/// to every later request. [`export_cookies`](Self::export_cookies) and
/// [`restore_cookies`](Self::restore_cookies) move them across process
/// restarts.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api: ApiUrl,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Create a transport for `config.api` with an empty cookie jar.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| TransportError::Http {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api: config.api.clone(),
            jar,
        })
    }

    /// Returns the API base this transport talks to.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// The cookies the service has set, as `name=value` pairs.
    ///
    /// # Security
    ///
    /// These are live credentials. Store them with restrictive permissions.
    pub fn export_cookies(&self) -> Vec<String> {
        let mut cookies: Vec<String> = Vec::new();
        for url in self.credential_urls() {
            let Some(header) = self.jar.cookies(&url) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                continue;
            };
            for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                if !cookies.iter().any(|c| c == pair) {
                    cookies.push(pair.to_string());
                }
            }
        }
        cookies
    }

    /// Put previously exported cookies back into the jar.
    pub fn restore_cookies<I, S>(&self, cookies: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = self.api.as_url();
        let mut restored = 0usize;
        for cookie in cookies {
            self.jar
                .add_cookie_str(&format!("{}; Path=/", cookie.as_ref()), base);
            restored += 1;
        }
        debug!(restored, "Restored cookies");
    }

    fn credential_urls(&self) -> impl Iterator<Item = Url> + '_ {
        CREDENTIAL_ENDPOINTS
            .into_iter()
            .filter_map(|path| Url::parse(&self.api.endpoint(path)).ok())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(api = %self.api))]
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.api.endpoint(request.path());
        debug!(method = %request.method(), %url, "HTTP request");

        let builder = match request.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = match request.body() {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        trace!(status, bytes = body.len(), "HTTP response");

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api", &self.api)
            .field("cookies", &"[REDACTED]")
            .finish()
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    let error = if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connection {
            message: e.to_string(),
        }
    } else if e.is_body() || e.is_decode() {
        TransportError::Decode {
            message: e.to_string(),
        }
    } else {
        TransportError::Http {
            message: e.to_string(),
        }
    };
    error.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpTransport {
        let config = ClientConfig::new(ApiUrl::new("http://localhost:3000/api").unwrap());
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn restored_cookies_are_exported_once() {
        let transport = transport();
        transport.restore_cookies(["session=abc", "refresh=def"]);

        let mut cookies = transport.export_cookies();
        cookies.sort();
        assert_eq!(cookies, ["refresh=def", "session=abc"]);
    }

    #[test]
    fn empty_jar_exports_nothing() {
        assert!(transport().export_cookies().is_empty());
    }

    #[test]
    fn debug_hides_cookies() {
        let transport = transport();
        transport.restore_cookies(["session=topsecret"]);
        let debug = format!("{:?}", transport);
        assert!(!debug.contains("topsecret"));
    }
}
