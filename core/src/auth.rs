//! Authorization strategies applied to every outgoing request.
//!
//! The strategy is chosen when the client is built and never changes. It runs
//! once per request, after the request is fully built and right before it is
//! handed to the transport.

use std::fmt;
use std::sync::Arc;

use crate::http::HttpRequest;
use crate::pair::Pair;

/// Request mutation used by `Authorization::Custom`.
pub type AuthorizeFn = Arc<dyn Fn(&mut HttpRequest) + Send + Sync>;

#[derive(Clone, Default)]
pub enum Authorization {
    /// Leave the request untouched.
    #[default]
    None,
    /// Full `Authorization` header value, already prefixed with `Bearer `.
    Bearer(String),
    /// Set each pair as a header, overwriting existing values.
    Headers(Vec<Pair>),
    Custom(AuthorizeFn),
}

impl Authorization {
    pub fn bearer(token: impl AsRef<str>) -> Self {
        Authorization::Bearer(format!("Bearer {}", token.as_ref()))
    }

    pub fn headers(pairs: impl IntoIterator<Item = Pair>) -> Self {
        Authorization::Headers(pairs.into_iter().collect())
    }

    pub fn custom(f: impl Fn(&mut HttpRequest) + Send + Sync + 'static) -> Self {
        Authorization::Custom(Arc::new(f))
    }

    pub fn apply(&self, request: &mut HttpRequest) {
        match self {
            Authorization::None => {}
            Authorization::Bearer(value) => request.set_header("Authorization", value.as_str()),
            Authorization::Headers(pairs) => {
                for pair in pairs {
                    request.set_header(pair.key(), pair.value());
                }
            }
            Authorization::Custom(f) => f(request),
        }
    }
}

// Credentials stay out of debug output.
impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::None => f.write_str("None"),
            Authorization::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Authorization::Headers(pairs) => f
                .debug_tuple("Headers")
                .field(&pairs.iter().map(Pair::key).collect::<Vec<_>>())
                .finish(),
            Authorization::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::pair::header;

    fn request() -> HttpRequest {
        let mut req = HttpRequest::new(Method::Post, "https://api.example.com/user");
        req.set_header("Content-Type", "application/json");
        req
    }

    #[test]
    fn none_leaves_request_unchanged() {
        let mut req = request();
        let before = req.clone();
        Authorization::None.apply(&mut req);
        assert_eq!(req, before);
    }

    #[test]
    fn bearer_sets_authorization_header() {
        let mut req = request();
        req.set_header("authorization", "Basic stale");
        Authorization::bearer("abc123").apply(&mut req);
        assert_eq!(req.header("Authorization"), Some("Bearer abc123"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn headers_overwrite_duplicates_last_wins() {
        let mut req = request();
        Authorization::headers([
            header("X-Api-Key", "first"),
            header("X-Client", "cli"),
            header("x-api-key", "second"),
        ])
        .apply(&mut req);
        assert_eq!(req.header("X-Api-Key"), Some("second"));
        assert_eq!(req.header("X-Client"), Some("cli"));
    }

    #[test]
    fn custom_closure_runs() {
        let mut req = request();
        Authorization::custom(|r| r.set_header("X-Signature", format!("{}:{}", r.method, r.url)))
            .apply(&mut req);
        assert_eq!(
            req.header("X-Signature"),
            Some("POST:https://api.example.com/user")
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let shown = format!("{:?}", Authorization::bearer("abc123"));
        assert!(!shown.contains("abc123"));
        let shown = format!("{:?}", Authorization::headers([header("X-Api-Key", "s3cr3t")]));
        assert!(shown.contains("X-Api-Key"));
        assert!(!shown.contains("s3cr3t"));
    }
}
