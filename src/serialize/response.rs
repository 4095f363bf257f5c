//! Response projection: bounded, sanitized view of an outbound response.

use http::header::{HeaderMap, CONTENT_TYPE};
use http::StatusCode;
use serde_json::{Map, Value};

use crate::sanitize::SanitizationPolicy;
use crate::serialize::error::{serialize_error, ErrorReport};
use crate::serialize::project_body;

/// The pieces of an HTTP-like response the projection consumes.
#[derive(Debug)]
pub struct ResponseInfo<'a> {
    pub status: StatusCode,
    pub headers: &'a HeaderMap,
    /// Elapsed milliseconds, typically `RequestContext::elapsed_ms()`.
    pub response_time_ms: Option<&'a str>,
    pub body: Option<&'a [u8]>,
    pub error: Option<&'a ErrorReport>,
}

/// Project a response into sanitized plain data, mirroring the request
/// body rules. Never fails.
pub fn serialize_response(res: &ResponseInfo<'_>, policy: &SanitizationPolicy) -> Value {
    let mut out = Map::new();

    out.insert(
        "statusCode".into(),
        Value::Number(res.status.as_u16().into()),
    );

    if let Some(elapsed) = res.response_time_ms {
        out.insert("responseTime".into(), Value::String(elapsed.to_string()));
    }

    if let Some(body) = res.body {
        let content_type = res
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        out.insert("body".into(), project_body(body, content_type, policy));
    }

    if let Some(error) = res.error {
        out.insert("error".into(), serialize_error(error, policy));
    }

    Value::Object(out)
}
