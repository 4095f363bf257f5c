//! Bounded projections of runtime objects into sanitized plain data.
//!
//! # Data Flow
//! ```text
//! HTTP-like request / response / error
//!     → request.rs / response.rs / error.rs
//!     → sanitize subsystem (headers, query, body)
//!     → plain Value maps, safe for the log shaper
//! ```
//!
//! # Design Decisions
//! - None of the projections ever fail: body parse problems degrade to a
//!   truncated-text or descriptive fallback, logged at best effort
//! - Bodies are bounded by content type before anything is inlined

pub mod error;
pub mod request;
pub mod response;

use serde_json::{json, Value};

use crate::sanitize::engine::{sanitize_body, sanitize_value};
use crate::sanitize::SanitizationPolicy;

pub use error::{serialize_error, ErrorReport};
pub use request::{serialize_request, RequestInfo};
pub use response::{serialize_response, ResponseInfo};

pub(crate) const TRUNCATED: &str = "...[TRUNCATED]";

/// Content-type-aware body projection shared by request and response.
///
/// JSON and form-encoded bodies are sanitized as structured data;
/// multipart is described by metadata only, never inlined; text is
/// truncated at the policy's inline-string bound; anything else becomes
/// an opaque content-type marker.
pub(crate) fn project_body(
    body: &[u8],
    content_type: Option<&str>,
    policy: &SanitizationPolicy,
) -> Value {
    let media_type = content_type
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if media_type == "application/json" || media_type.ends_with("+json") {
        let text = String::from_utf8_lossy(body);
        match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => return sanitize_body(&parsed, policy, 0),
            Err(err) => {
                tracing::warn!(%err, "unparseable JSON body, logging as truncated text");
                return Value::String(truncate_text(&text, policy.max_inline_string_len));
            }
        }
    }

    if media_type == "application/x-www-form-urlencoded" {
        let mut out = serde_json::Map::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            let sanitized = sanitize_value(&key, &Value::String(value.into_owned()), policy);
            out.insert(key.into_owned(), sanitized);
        }
        return Value::Object(out);
    }

    if media_type.starts_with("multipart/") {
        return json!({
            "contentType": media_type,
            "size": body.len(),
            "note": "multipart content not logged",
        });
    }

    if media_type.starts_with("text/") || media_type.is_empty() {
        let text = String::from_utf8_lossy(body);
        return Value::String(truncate_text(&text, policy.max_inline_string_len));
    }

    Value::String(format!("[{} content omitted]", media_type))
}

/// Truncate on a char boundary, appending the truncation marker.
pub(crate) fn truncate_text(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let cut = text
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= max_len)
        .last()
        .unwrap_or(0);
    format!("{}{}", &text[..cut], TRUNCATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SanitizationPolicy {
        SanitizationPolicy::default()
    }

    #[test]
    fn test_json_body_sanitized() {
        let body = br#"{"password":"p@ss1234","name":"Ann"}"#;
        let out = project_body(body, Some("application/json; charset=utf-8"), &policy());
        assert_eq!(out, json!({"password": "[REDACTED]", "name": "Ann"}));
    }

    #[test]
    fn test_broken_json_degrades_to_text() {
        let out = project_body(b"{broken", Some("application/json"), &policy());
        assert_eq!(out, json!("{broken"));
    }

    #[test]
    fn test_form_body_sanitized() {
        let body = b"user=ann&password=p%40ss";
        let out = project_body(body, Some("application/x-www-form-urlencoded"), &policy());
        assert_eq!(out, json!({"user": "ann", "password": "[REDACTED]"}));
    }

    #[test]
    fn test_multipart_described_not_inlined() {
        let out = project_body(b"raw-bytes", Some("multipart/form-data; boundary=x"), &policy());
        assert_eq!(out["contentType"], json!("multipart/form-data"));
        assert_eq!(out["size"], json!(9));
        assert!(out.get("body").is_none());
    }

    #[test]
    fn test_text_truncated_with_marker() {
        let long = "a".repeat(3000);
        let out = project_body(long.as_bytes(), Some("text/plain"), &policy());
        let text = out.as_str().unwrap();
        assert!(text.ends_with(TRUNCATED));
        assert!(text.len() < 3000);
    }

    #[test]
    fn test_opaque_marker_for_other_types() {
        let out = project_body(&[0, 1, 2], Some("application/octet-stream"), &policy());
        assert_eq!(out, json!("[application/octet-stream content omitted]"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(600); // 2 bytes per char
        let out = truncate_text(&text, 1024);
        assert!(out.ends_with(TRUNCATED));
        assert!(out.is_char_boundary(out.len() - TRUNCATED.len()));
    }
}
