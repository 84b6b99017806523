//! Echo server for exercising HTTP clients over a real socket.
//!
//! Any method on any path is answered with a JSON description of the request
//! it received, so tests can assert on exactly what went over the wire.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// What the server saw. Header names are lowercase; repeated headers are
/// joined with `", "`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .route("/raw", any(raw))
        .route("/reflect", any(reflect))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<EchoedRequest> {
    let echoed = EchoedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: flatten_headers(&headers),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    debug!(method = %echoed.method, path = %echoed.path, "echo");
    Json(echoed)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((code, Json(serde_json::json!({}))))
}

async fn raw() -> &'static str {
    "plain text, not json"
}

async fn reflect(body: Bytes) -> ([(header::HeaderName, &'static str); 1], Bytes) {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|v| {
                v.push_str(", ");
                v.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn flatten_lowercases_and_joins_repeats() {
        let mut headers = HeaderMap::new();
        headers.append("X-Tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));
        headers.insert("Authorization", HeaderValue::from_static("Bearer t"));

        let flat = flatten_headers(&headers);
        assert_eq!(flat["x-tag"], "a, b");
        assert_eq!(flat["authorization"], "Bearer t");
    }

    #[test]
    fn echoed_request_roundtrips_through_json() {
        let echoed = EchoedRequest {
            method: "PATCH".to_string(),
            path: "/user".to_string(),
            query: None,
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: r#"{"name":"John"}"#.to_string(),
        };
        let json = serde_json::to_string(&echoed).unwrap();
        let back: EchoedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, echoed);
    }
}
