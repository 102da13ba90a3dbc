//! API error type, classified for retry logging and user messages.

use crate::retry::{classify_curl_error, classify_http_status, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("API base URL cannot take a path: {0}")]
    NotABase(String),
    /// Empty, `.` or `..` segment, which would not address a single resource.
    #[error("invalid path segment {0:?}")]
    InvalidPathSegment(String),
    /// Server answered with a 5xx status.
    #[error("server error: HTTP {status}")]
    ServerFault { status: u16, body: String },
    /// No response was received.
    #[error("no response from server: {0}")]
    Network(#[source] curl::Error),
    /// Curl failed for a reason other than connectivity (bad option, TLS setup...).
    #[error("request failed: {0}")]
    Transport(#[source] curl::Error),
    /// Non-2xx, non-5xx status where a successful body was expected.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("request task failed: {0}")]
    Task(String),
}

impl From<curl::Error> for ApiError {
    fn from(e: curl::Error) -> Self {
        match classify_curl_error(&e) {
            ErrorKind::Network => ApiError::Network(e),
            _ => ApiError::Transport(e),
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ServerFault { status, .. } => ErrorKind::ServerFault(*status),
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Status { status, .. } => classify_http_status(u32::from(*status)),
            ApiError::InvalidUrl(_)
            | ApiError::NotABase(_)
            | ApiError::InvalidPathSegment(_)
            | ApiError::Transport(_)
            | ApiError::Decode(_)
            | ApiError::Task(_) => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let e = ApiError::ServerFault {
            status: 502,
            body: String::new(),
        };
        assert_eq!(e.kind(), ErrorKind::ServerFault(502));
        assert_eq!(e.to_string(), "server error: HTTP 502");
        assert_eq!(ApiError::Task("panicked".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn curl_connect_failure_is_network() {
        // CURLE_COULDNT_CONNECT
        let e = ApiError::from(curl::Error::new(7));
        assert_eq!(e.kind(), ErrorKind::Network);
        // CURLE_URL_MALFORMAT
        let e = ApiError::from(curl::Error::new(3));
        assert_eq!(e.kind(), ErrorKind::Other);
    }
}
