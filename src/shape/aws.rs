//! AWS CloudWatch-style structured-logging shape.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::config::TracekitConfig;
use crate::context::ContextSnapshot;
use crate::shape::gcp::{as_string, take_message};
use crate::shape::severity::severity_for;
use crate::trace::codec::xray_root;

/// Record fields assembled into the nested `request` object.
const REQUEST_FIELDS: &[&str] = &["method", "url", "clientIp", "contentLength", "userAgent"];

const INTERNAL_FIELDS: &[&str] = &["pid", "hostname", "level"];

/// Shape a record for AWS: `severity`, ISO-8601 `timestamp`, `service`,
/// X-Ray trace id plus header-style string, an assembled `request`
/// object, and pass-through of everything unrecognized. GCP vendor
/// fields are always stripped, even when present on the input.
pub fn shape(
    mut record: Map<String, Value>,
    config: &TracekitConfig,
    ctx: Option<&ContextSnapshot>,
) -> Map<String, Value> {
    let mut out = Map::new();

    out.insert(
        "severity".into(),
        Value::String(severity_for(record.get("level")).into()),
    );
    out.insert(
        "timestamp".into(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    out.insert(
        "service".into(),
        Value::String(
            record
                .remove("service")
                .and_then(as_string)
                .unwrap_or_else(|| config.service.clone()),
        ),
    );

    if let Some(message) = take_message(&mut record) {
        out.insert("message".into(), Value::String(message));
    }

    let trace_id = record
        .remove("traceId")
        .and_then(as_string)
        .or_else(|| ctx.map(|c| c.trace_id.clone()));
    let span_id = record
        .remove("spanId")
        .and_then(as_string)
        .or_else(|| ctx.map(|c| c.span_id.clone()));

    if config.include_trace {
        if let Some(trace_id) = trace_id {
            // One-way conversion: W3C-style ids get the current epoch
            // second embedded, so the time component is approximate.
            let root = xray_root(&trace_id);
            let mut header = format!("Root={}", root);
            if let Some(span_id) = &span_id {
                header.push_str(&format!(";Parent={}", span_id));
            }
            let sampled = ctx.map(|c| c.sampled).unwrap_or(true);
            header.push_str(&format!(";Sampled={}", u8::from(sampled)));

            out.insert("traceId".into(), Value::String(root));
            out.insert("x-amzn-trace-id".into(), Value::String(header));
        }
    }

    let mut request = Map::new();
    for field in REQUEST_FIELDS {
        if let Some(value) = record.remove(*field) {
            request.insert((*field).into(), value);
        }
    }
    if !request.is_empty() {
        out.insert("request".into(), Value::Object(request));
    }

    if let Some(body) = record.remove("body") {
        out.insert("body".into(), body);
    }

    for field in INTERNAL_FIELDS {
        record.remove(*field);
    }
    // Defensive cleanup against cross-vendor leakage.
    record.retain(|key, _| !key.starts_with("logging.googleapis.com/"));

    for (key, value) in record {
        out.entry(key).or_insert(value);
    }

    out
}
