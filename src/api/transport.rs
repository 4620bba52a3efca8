//! HTTP transport for the posts API

use std::fmt;
use std::time::Duration;
use ureq::Agent;

use super::ApiError;

/// Maximum response body size accepted from the API (10 MB)
pub const MAX_RESPONSE_SIZE: u64 = 10 * 1024 * 1024;

/// HTTP method of an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Sends one request to the API and returns the response body.
///
/// Implementations map 404 to [`ApiError::NotFound`] and any other non-2xx
/// status to [`ApiError::Status`].
pub trait Transport: Send + Sync {
    fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<String, ApiError>;
}

/// Transport over HTTPS with a global timeout
pub struct HttpTransport {
    base_url: String,
    agent: Agent,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, path: &str, body: Option<String>) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let body = body.unwrap_or_default();
        tracing::debug!("{} {}", method, url);

        let result = match method {
            Method::Get => self
                .agent
                .get(url.as_str())
                .header("Accept", "application/json")
                .call(),
            Method::Delete => self
                .agent
                .delete(url.as_str())
                .header("Accept", "application/json")
                .call(),
            Method::Post => self
                .agent
                .post(url.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body.as_str()),
            Method::Put => self
                .agent
                .put(url.as_str())
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .send(body.as_str()),
        };

        let mut body = result.map_err(map_ureq_error)?.into_body();
        body.with_config()
            .limit(MAX_RESPONSE_SIZE)
            .read_to_string()
            .map_err(map_ureq_error)
    }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::StatusCode(404) => ApiError::NotFound,
        ureq::Error::StatusCode(code) => ApiError::Status(code),
        ureq::Error::Timeout(_) => ApiError::Timeout,
        other => ApiError::Connection(other.to_string()),
    }
}
