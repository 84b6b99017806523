//! Error types for the client.
//!
//! # Design
//! A call can fail in three disjoint places: encoding the request body
//! (`Marshal`), sending it (`Transport`), or decoding the response body into
//! the caller's target (`Unmarshal`). `Unmarshal` carries the full response so
//! callers can still inspect status and headers. `InvalidUrl` covers a base
//! URL and path that do not join into a parseable URL.

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `Client` verb methods.
#[derive(Debug, Error)]
pub enum Error {
    /// The request body could not be serialized to JSON. Nothing was sent.
    #[error("failed to marshal request body: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Base URL and path did not form a valid URL. Nothing was sent.
    #[error("invalid request url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The transport failed to deliver the request or read the response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response arrived but its body did not decode into the target.
    #[error("failed to unmarshal response body (status {}): {source}", .response.status)]
    Unmarshal {
        #[source]
        source: serde_json::Error,
        response: Box<HttpResponse>,
    },
}

impl Error {
    /// The response received before the failure, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Error::Unmarshal { response, .. } => Some(&**response),
            _ => None,
        }
    }
}

/// Failures raised by a `Transport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, or the host could not be resolved.
    #[error("connection error: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    /// The request could not be expressed on the wire (bad method token,
    /// header name or value).
    #[error("invalid request: {0}")]
    Request(String),

    /// Reading the response body failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
                TransportError::Connection(err.to_string())
            }
            ureq::Error::Io(io_err) => match io_err.kind() {
                std::io::ErrorKind::TimedOut => TransportError::Timeout,
                std::io::ErrorKind::ConnectionRefused
                | std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::NotConnected => {
                    TransportError::Connection(io_err.to_string())
                }
                _ => TransportError::Io(io_err),
            },
            other => TransportError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("not json").unwrap_err()
    }

    #[test]
    fn marshal_display() {
        let err = Error::Marshal(json_error());
        assert!(err.to_string().starts_with("failed to marshal request body"));
        assert!(err.response().is_none());
    }

    #[test]
    fn unmarshal_keeps_response() {
        let err = Error::Unmarshal {
            source: json_error(),
            response: Box::new(HttpResponse {
                status: 502,
                headers: Vec::new(),
                body: b"bad gateway".to_vec(),
            }),
        };
        assert!(err.to_string().contains("status 502"));
        assert_eq!(err.response().map(|r| r.status), Some(502));
    }

    #[test]
    fn transport_error_converts() {
        let err: Error = TransportError::Timeout.into();
        assert!(matches!(err, Error::Transport(TransportError::Timeout)));
        assert_eq!(err.to_string(), "transport error: request timed out");
    }

    #[test]
    fn refused_io_error_maps_to_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::from(ureq::Error::Io(io));
        assert!(matches!(err, TransportError::Connection(_)));
    }
}
