//! Google Cloud structured-logging shape.

use serde_json::{Map, Value};

use crate::config::TracekitConfig;
use crate::context::ContextSnapshot;
use crate::shape::severity::severity_for;

pub const TRACE_FIELD: &str = "logging.googleapis.com/trace";
pub const SPAN_FIELD: &str = "logging.googleapis.com/spanId";
pub const LABELS_FIELD: &str = "logging.googleapis.com/labels";

/// Internal bookkeeping fields stripped from the final output.
const INTERNAL_FIELDS: &[&str] = &["pid", "hostname", "level"];

/// Shape a record for GCP: `severity`, vendor-prefixed trace/span fields,
/// a labels block, and pass-through of everything unrecognized.
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

    if let Some(message) = take_message(&mut record) {
        out.insert("message".into(), Value::String(message));
    }

    let project_id = record
        .remove("projectId")
        .and_then(as_string)
        .or_else(|| config.project_id.clone());
    let trace_id = record
        .remove("traceId")
        .and_then(as_string)
        .or_else(|| ctx.map(|c| c.trace_id.clone()));
    let span_id = record
        .remove("spanId")
        .and_then(as_string)
        .or_else(|| ctx.map(|c| c.span_id.clone()));
    let request_id = record
        .remove("requestId")
        .and_then(as_string)
        .or_else(|| ctx.map(|c| c.request_id.clone()));
    let service = record
        .remove("service")
        .and_then(as_string)
        .unwrap_or_else(|| config.service.clone());
    let record_type = record.remove("type").and_then(as_string);

    if config.include_trace {
        if let Some(trace_id) = trace_id {
            let trace = match &project_id {
                Some(project) => format!("projects/{}/traces/{}", project, trace_id),
                None => trace_id,
            };
            out.insert(TRACE_FIELD.into(), Value::String(trace));
        }
        if let Some(span_id) = span_id {
            out.insert(SPAN_FIELD.into(), Value::String(span_id));
        }
    }

    if config.include_labels {
        let mut labels = Map::new();
        if let Some(request_id) = request_id {
            labels.insert("requestId".into(), Value::String(request_id));
        }
        labels.insert("service".into(), Value::String(service.clone()));
        let log_name = match record_type {
            Some(t) => format!("{}-{}", service, t),
            None => service,
        };
        labels.insert("logName".into(), Value::String(log_name));
        out.insert(LABELS_FIELD.into(), Value::Object(labels));
    }

    for field in INTERNAL_FIELDS {
        record.remove(*field);
    }

    // Forward-compatible: everything unrecognized passes through.
    for (key, value) in record {
        out.entry(key).or_insert(value);
    }

    out
}

/// Message from a non-empty `msg`, else a non-empty `message`, else none.
/// An empty message field is never emitted.
pub(crate) fn take_message(record: &mut Map<String, Value>) -> Option<String> {
    for field in ["msg", "message"] {
        if let Some(value) = record.remove(field) {
            if let Some(text) = as_string(value).filter(|t| !t.is_empty()) {
                return Some(text);
            }
        }
    }
    None
}

pub(crate) fn as_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}
