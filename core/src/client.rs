//! The JSON REST client.
//!
//! # Design
//! `Client` holds a base URL, a transport and an authorization strategy, all
//! fixed at construction. Every verb call turns into exactly one
//! `HttpRequest`:
//!
//! 1. the URL is `base_url + path`, joined verbatim: dot segments and
//!    repeated slashes reach the wire untouched, only a fragment is dropped;
//! 2. GET/DELETE append their query pairs, in call order, keeping duplicates;
//!    POST/PUT/PATCH/custom encode their body as JSON instead;
//! 3. the authorization strategy runs last, right before the transport sends.
//!
//! The response body, already drained by the transport, is decoded into the
//! caller's target only when one was given.

use tracing::{debug, trace};
use url::{form_urlencoded, Url};

use crate::auth::Authorization;
use crate::body::{RequestBody, ResponseTarget};
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, Method};
use crate::pair::Pair;
use crate::transport::{Transport, UreqTransport};

/// The verb operations every client exposes.
///
/// Code written against `RestClient` accepts `Client` with any transport as
/// well as test doubles implementing the trait directly.
pub trait RestClient {
    fn get<R: ResponseTarget>(
        &self,
        path: &str,
        target: R,
        query: &[Pair],
    ) -> Result<HttpResponse, Error>;

    fn post<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error>;

    fn put<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error>;

    fn patch<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error>;

    fn delete<R: ResponseTarget>(
        &self,
        path: &str,
        target: R,
        query: &[Pair],
    ) -> Result<HttpResponse, Error>;

    fn custom<M: Into<Method>, B: RequestBody, R: ResponseTarget>(
        &self,
        method: M,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error>;
}

#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    base_url: String,
    transport: T,
    authorization: Authorization,
}

impl Client<UreqTransport> {
    /// Client without credentials.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder(base_url).build()
    }

    /// Client sending `Authorization: Bearer <token>` on every request.
    pub fn with_bearer(base_url: impl Into<String>, token: impl AsRef<str>) -> Self {
        Self::builder(base_url).bearer(token).build()
    }

    /// Client setting each pair as a header on every request.
    pub fn with_headers(
        base_url: impl Into<String>,
        headers: impl IntoIterator<Item = Pair>,
    ) -> Self {
        Self::builder(base_url).headers(headers).build()
    }

    pub fn builder(base_url: impl Into<String>) -> ClientBuilder<UreqTransport> {
        ClientBuilder {
            base_url: base_url.into(),
            transport: UreqTransport::new(),
            authorization: Authorization::None,
        }
    }
}

impl<T: Transport> Client<T> {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn without_body<R: ResponseTarget>(
        &self,
        method: Method,
        path: &str,
        target: R,
        query: &[Pair],
    ) -> Result<HttpResponse, Error> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            append_query(&mut url, query);
        }

        let request = self.new_request(method, url, None);
        self.send(&request, target)
    }

    fn with_body<B: RequestBody, R: ResponseTarget>(
        &self,
        method: Method,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error> {
        let body = body.encode().map_err(Error::Marshal)?;
        let url = self.url(path)?;

        let request = self.new_request(method, url, body);
        self.send(&request, target)
    }

    /// `base_url + path` as given. Parsing only validates it; the parsed form
    /// would resolve `.` and `..` segments.
    fn url(&self, path: &str) -> Result<String, Error> {
        let mut raw = format!("{}{}", self.base_url, path);
        if let Err(source) = Url::parse(&raw) {
            return Err(Error::InvalidUrl { url: raw, source });
        }
        if let Some(at) = raw.find('#') {
            raw.truncate(at);
        }
        Ok(raw)
    }

    /// Build the request and authorize it. Authorization is always the last
    /// mutation, so it may overwrite any header set here.
    fn new_request(&self, method: Method, url: String, body: Option<Vec<u8>>) -> HttpRequest {
        let mut request = HttpRequest::new(method, url);
        if body.is_some() {
            request.set_header("Content-Type", "application/json");
        }
        request.body = body;

        self.authorization.apply(&mut request);
        request
    }

    fn send<R: ResponseTarget>(
        &self,
        request: &HttpRequest,
        target: R,
    ) -> Result<HttpResponse, Error> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        trace!(status = response.status, bytes = response.body.len(), "received response");

        if !target.wants_body() {
            return Ok(response);
        }

        match target.decode(&response.body) {
            Ok(()) => Ok(response),
            Err(source) => Err(Error::Unmarshal {
                source,
                response: Box::new(response),
            }),
        }
    }
}

/// Append form-encoded pairs after any query already present in `url`.
fn append_query(url: &mut String, query: &[Pair]) {
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter().map(|pair| (pair.key(), pair.value())))
        .finish();

    match url.find('?') {
        None => url.push('?'),
        Some(_) if url.ends_with('?') || url.ends_with('&') => {}
        Some(_) => url.push('&'),
    }
    url.push_str(&encoded);
}

impl<T: Transport> RestClient for Client<T> {
    fn get<R: ResponseTarget>(
        &self,
        path: &str,
        target: R,
        query: &[Pair],
    ) -> Result<HttpResponse, Error> {
        self.without_body(Method::Get, path, target, query)
    }

    fn post<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error> {
        self.with_body(Method::Post, path, body, target)
    }

    fn put<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error> {
        self.with_body(Method::Put, path, body, target)
    }

    fn patch<B: RequestBody, R: ResponseTarget>(
        &self,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error> {
        self.with_body(Method::Patch, path, body, target)
    }

    fn delete<R: ResponseTarget>(
        &self,
        path: &str,
        target: R,
        query: &[Pair],
    ) -> Result<HttpResponse, Error> {
        self.without_body(Method::Delete, path, target, query)
    }

    fn custom<M: Into<Method>, B: RequestBody, R: ResponseTarget>(
        &self,
        method: M,
        path: &str,
        body: B,
        target: R,
    ) -> Result<HttpResponse, Error> {
        self.with_body(method.into(), path, body, target)
    }
}

/// Construction-time configuration for `Client`.
#[derive(Debug)]
pub struct ClientBuilder<T> {
    base_url: String,
    transport: T,
    authorization: Authorization,
}

impl<T: Transport> ClientBuilder<T> {
    pub fn bearer(mut self, token: impl AsRef<str>) -> Self {
        self.authorization = Authorization::bearer(token);
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = Pair>) -> Self {
        self.authorization = Authorization::headers(headers);
        self
    }

    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    pub fn authorize(self, f: impl Fn(&mut HttpRequest) + Send + Sync + 'static) -> Self {
        self.authorization(Authorization::custom(f))
    }

    pub fn transport<U: Transport>(self, transport: U) -> ClientBuilder<U> {
        ClientBuilder {
            base_url: self.base_url,
            transport,
            authorization: self.authorization,
        }
    }

    pub fn build(self) -> Client<T> {
        Client {
            base_url: self.base_url,
            transport: self.transport,
            authorization: self.authorization,
        }
    }
}
