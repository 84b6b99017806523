//! The seam between the client and the network.
//!
//! # Design
//! `Client` never touches sockets itself. It hands a finished `HttpRequest`
//! to a `Transport` and expects an `HttpResponse` with the body already read
//! to completion. `UreqTransport` is the default, a blocking ureq agent;
//! tests substitute recording transports.
//!
//! Thread-safety of a shared client is whatever the transport provides;
//! `UreqTransport` is `Send + Sync` and pools connections internally.

use std::io::Read;
use std::sync::Arc;

use ureq::http;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Method};

/// Sends a request and returns the fully-read response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Non-2xx statuses are returned as responses rather than errors so the
/// caller decides what a status means.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an existing agent. Its `http_status_as_error` setting is kept
    /// as-is, so an agent left at ureq's default reports 4xx/5xx as
    /// transport errors.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match &request.body {
            Some(body) => Some(body.as_slice()),
            None if expects_body(&request.method) => Some(&[][..]),
            None => None,
        };

        let response = match body {
            Some(body) => {
                let req = builder
                    .body(body)
                    .map_err(|e| TransportError::Request(e.to_string()))?;
                self.agent.run(req)?
            }
            None => {
                let req = builder
                    .body(())
                    .map_err(|e| TransportError::Request(e.to_string()))?;
                self.agent.run(req)?
            }
        };

        let (parts, mut body) = response.into_parts();
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        // Drain the body so the connection is released before returning.
        let mut bytes = Vec::new();
        body.as_reader().read_to_end(&mut bytes)?;

        Ok(HttpResponse {
            status: parts.status.as_u16(),
            headers,
            body: bytes,
        })
    }
}

/// Methods that announce `Content-Length: 0` when sent without a body,
/// rather than an empty chunked stream.
fn expects_body(method: &Method) -> bool {
    matches!(method, Method::Post | Method::Put | Method::Patch)
}
