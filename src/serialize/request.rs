//! Request projection: bounded, sanitized view of an inbound request.

use std::net::SocketAddr;

use http::header::{HeaderMap, CONTENT_TYPE};
use http::{Method, Uri};
use serde_json::{Map, Value};

use crate::sanitize::engine::{sanitize_headers, sanitize_value};
use crate::sanitize::SanitizationPolicy;
use crate::serialize::project_body;

/// The pieces of an HTTP-like request the projection consumes. The
/// hosting framework owns the real request type; it hands over borrowed
/// parts so this core stays framework-agnostic.
#[derive(Debug)]
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub remote_addr: Option<SocketAddr>,
    /// Route parameters resolved by the hosting router, if any.
    pub params: Option<&'a Map<String, Value>>,
    pub body: Option<&'a [u8]>,
}

/// Project a request into sanitized plain data. Never fails: missing
/// pieces are simply omitted and body problems degrade inside
/// [`project_body`].
pub fn serialize_request(req: &RequestInfo<'_>, policy: &SanitizationPolicy) -> Value {
    let mut out = Map::new();

    out.insert("method".into(), Value::String(req.method.to_string()));
    out.insert("url".into(), Value::String(req.uri.to_string()));
    out.insert("path".into(), Value::String(req.uri.path().to_string()));

    if let Some(params) = req.params {
        let mut sanitized = Map::new();
        for (key, value) in params {
            sanitized.insert(key.clone(), sanitize_value(key, value, policy));
        }
        out.insert("params".into(), Value::Object(sanitized));
    }

    out.insert(
        "headers".into(),
        Value::Object(sanitize_headers(req.headers, policy)),
    );

    if let Some(addr) = req.remote_addr {
        out.insert("remoteAddress".into(), Value::String(addr.to_string()));
    }

    if let Some(query) = req.uri.query() {
        let mut sanitized = Map::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = sanitize_value(&key, &Value::String(value.into_owned()), policy);
            sanitized.insert(key.into_owned(), value);
        }
        out.insert("query".into(), Value::Object(sanitized));
    }

    if let Some(body) = req.body {
        let content_type = req
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        out.insert("body".into(), project_body(body, content_type, policy));
    }

    Value::Object(out)
}
