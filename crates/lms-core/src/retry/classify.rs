//! Classify HTTP statuses and curl errors for logging and user messages.

use crate::retry::policy::ErrorKind;

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        500..=599 => ErrorKind::ServerFault(code as u16),
        400..=499 => ErrorKind::Client(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error: anything where no response arrived is `Network`.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout()
        || e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Network;
    }
    ErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_5xx_server_fault() {
        assert_eq!(classify_http_status(500), ErrorKind::ServerFault(500));
        assert_eq!(classify_http_status(503), ErrorKind::ServerFault(503));
        assert!(classify_http_status(599).is_server_fault());
    }

    #[test]
    fn http_4xx_client() {
        assert_eq!(classify_http_status(404), ErrorKind::Client(404));
        assert_eq!(classify_http_status(429), ErrorKind::Client(429));
    }

    #[test]
    fn other_statuses() {
        assert_eq!(classify_http_status(302), ErrorKind::Other);
        assert_eq!(classify_http_status(200), ErrorKind::Other);
    }
}
