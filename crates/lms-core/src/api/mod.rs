//! HTTP client for the remote LMS API.
//!
//! Uses the curl crate (libcurl) on tokio's blocking pool. A 5xx answer and a
//! missing answer are both errors with distinct variants; every other status
//! comes back as an [`ApiResponse`] for the caller to judge.

mod error;

pub use error::ApiError;

use std::str;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::LmsConfig;
use crate::retry::{classify_http_status, ErrorKind};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a non-5xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a 2xx JSON body; other statuses become [`ApiError::Status`].
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Status {
                status: self.status,
                body: self.body.clone(),
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    connect_timeout: Duration,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::NotABase(base.to_string()));
        }
        Ok(Self {
            base,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config(cfg: &LmsConfig) -> Result<Self, ApiError> {
        Ok(Self::new(&cfg.api_base_url)?.with_timeouts(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        ))
    }

    pub fn with_timeouts(mut self, connect: Duration, total: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = total;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve `path` against the base URL; a leading '/' is ignored.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Append `segments` under the base path. Each one is percent-encoded into
    /// exactly one path segment, so ids cannot add query, fragment or parent parts.
    pub fn endpoint_at(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidPathSegment(bad.to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::NotABase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `path`. Runs the transfer on the blocking pool.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.fetch(self.endpoint(path)?).await
    }

    /// GET the endpoint built by [`ApiClient::endpoint_at`].
    pub async fn get_at(&self, segments: &[&str]) -> Result<ApiResponse, ApiError> {
        self.fetch(self.endpoint_at(segments)?).await
    }

    async fn fetch(&self, url: Url) -> Result<ApiResponse, ApiError> {
        let (connect_timeout, timeout) = (self.connect_timeout, self.timeout);
        tracing::debug!(%url, "GET");
        tokio::task::spawn_blocking(move || perform_get(&url, connect_timeout, timeout))
            .await
            .map_err(|e| ApiError::Task(e.to_string()))?
    }
}

fn perform_get(
    url: &Url,
    connect_timeout: Duration,
    timeout: Duration,
) -> Result<ApiResponse, ApiError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str())?;
    easy.follow_location(true)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    let body = match str::from_utf8(&body) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(&body).into_owned(),
    };
    match classify_http_status(code) {
        ErrorKind::ServerFault(status) => Err(ApiError::ServerFault { status, body }),
        _ => Ok(ApiResponse {
            status: code as u16,
            body,
        }),
    }
}
