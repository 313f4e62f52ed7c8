//! In-memory request and response values.
//!
//! verso does not own a network server. A [`Request`] is whatever the
//! embedding server (or a test) hands to the dispatcher, and a [`Response`]
//! is what comes back out of the pipeline. Both are built on the `http`
//! crate's method, URI, status and header types.

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::uri::InvalidUri;
use http::{HeaderMap, Method, StatusCode, Uri};

pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// An incoming request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
        }
    }

    /// Builds a request from a path with an optional query string.
    pub fn parse(method: Method, uri: &str) -> Result<Self, InvalidUri> {
        Ok(Self::new(method, uri.parse()?))
    }

    /// Shorthand for a `GET` request.
    ///
    /// # Panics
    ///
    /// Panics if `uri` is not a valid URI, like [`Uri::from_static`].
    pub fn get(uri: &'static str) -> Self {
        Self::new(Method::GET, Uri::from_static(uri))
    }

    /// Shorthand for a `POST` request.
    ///
    /// # Panics
    ///
    /// Panics if `uri` is not a valid URI, like [`Uri::from_static`].
    pub fn post(uri: &'static str) -> Self {
        Self::new(Method::POST, Uri::from_static(uri))
    }

    /// Adds a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Returns a header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    /// The path, without its query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }
}

/// A finished response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    /// A response with the given status and body and no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// `200 OK` with an HTML body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
            .with_typed_header(CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML))
    }

    /// `200 OK` with a JSON body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(StatusCode::OK, value.to_string())
            .with_typed_header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
    }

    /// `404 Not Found` with an empty body.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "")
    }

    /// `500 Internal Server Error` with an empty body.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "")
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Sets a header, replacing any existing value. Invalid names or values
    /// are ignored.
    pub fn with_header(self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Some((name, value)) => self.with_typed_header(name, value),
            None => self,
        }
    }

    /// Sets a header from already-validated parts.
    pub fn with_typed_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns a header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_str(&self.headers, name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
    let value = HeaderValue::from_str(value).ok()?;
    Some((name, value))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
