//! Error projection: plain-data view of a failure.

use serde_json::{Map, Value};

use crate::sanitize::engine::sanitize_body;
use crate::sanitize::SanitizationPolicy;

/// A failure description assembled by the caller (or from a
/// `std::error::Error`) before projection into a log record.
#[derive(Debug, Clone, Default)]
pub struct ErrorReport {
    /// Error class/kind name (e.g. `"ValidationError"`).
    pub kind: String,
    pub message: String,
    /// Machine-readable error code, if the domain defines one.
    pub code: Option<String>,
    pub status_code: Option<u16>,
    /// Rendered source chain, the closest Rust analog of a stack trace.
    pub stack: Option<String>,
    pub details: Option<Value>,
    /// Free-form context; sanitized before it reaches the record.
    pub context: Option<Value>,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Build a report from any error, rendering its source chain into the
    /// `stack` field.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut frames = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            frames.push(cause.to_string());
            source = cause.source();
        }
        let stack = (frames.len() > 1).then(|| frames.join("\n  caused by: "));

        Self {
            kind: "Error".into(),
            message: frames.remove(0),
            stack,
            ..Self::default()
        }
    }
}

/// Project an error report into sanitized plain data. Never fails; absent
/// fields are omitted.
pub fn serialize_error(report: &ErrorReport, policy: &SanitizationPolicy) -> Value {
    let mut out = Map::new();

    out.insert("type".into(), Value::String(report.kind.clone()));
    out.insert("message".into(), Value::String(report.message.clone()));
    if let Some(code) = &report.code {
        out.insert("code".into(), Value::String(code.clone()));
    }
    if let Some(stack) = &report.stack {
        out.insert("stack".into(), Value::String(stack.clone()));
    }
    if let Some(status) = report.status_code {
        out.insert("statusCode".into(), Value::Number(status.into()));
    }
    if let Some(details) = &report.details {
        out.insert("details".into(), details.clone());
    }
    if let Some(context) = &report.context {
        out.insert("context".into(), sanitize_body(context, policy, 0));
    }

    Value::Object(out)
}
