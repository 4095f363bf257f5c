//! Recursive redaction engine.
//!
//! # Responsibilities
//! - Redact sensitive fields by name and suspicious values by pattern
//! - Bound recursion depth and array width unconditionally
//! - Redact flat header maps by name
//!
//! # Design Decisions
//! - Depth overflow replaces the entire subtree with a marker rather than
//!   partially sanitizing it
//! - Arrays are truncated before per-element recursion, bounding the work
//!   and not just the output
//! - Markers are fixed short strings, stable under re-sanitization

use http::header::HeaderMap;
use serde_json::{Map, Value};

use crate::sanitize::patterns::{
    BASE64_URL_VALUE, BASE64_VALUE, CARD_NUMBER, EMAIL, PATTERN_MIN_LEN, SSN,
};
use crate::sanitize::policy::SanitizationPolicy;

pub const REDACTED: &str = "[REDACTED]";
pub const IMAGE_REDACTED: &str = "[IMAGE_DATA_REDACTED]";
pub const BASE64_REDACTED: &str = "[BASE64_DATA_REDACTED]";
pub const CARD_REDACTED: &str = "[CARD_NUMBER_REDACTED]";
pub const SSN_REDACTED: &str = "[SSN_REDACTED]";
pub const EMAIL_REDACTED: &str = "[EMAIL_REDACTED]";
pub const MAX_DEPTH_EXCEEDED: &str = "[MAX_DEPTH_EXCEEDED]";

fn marker(text: &str) -> Value {
    Value::String(text.to_string())
}

/// Sanitize a single keyed value. A sensitive key redacts the value
/// regardless of type; otherwise long strings are run through the value
/// heuristics in fixed order, short-circuiting on the first match.
pub fn sanitize_value(key: &str, value: &Value, policy: &SanitizationPolicy) -> Value {
    if policy.is_sensitive_field(key) {
        return marker(REDACTED);
    }

    if let Value::String(s) = value {
        if s.len() > PATTERN_MIN_LEN {
            if key.to_ascii_lowercase().contains("image") || s.starts_with("data:image/") {
                return marker(IMAGE_REDACTED);
            }
            if BASE64_VALUE.is_match(s) {
                return marker(BASE64_REDACTED);
            }
            if CARD_NUMBER.is_match(s) {
                return marker(CARD_REDACTED);
            }
            if SSN.is_match(s) {
                return marker(SSN_REDACTED);
            }
            if EMAIL.is_match(s) {
                return marker(EMAIL_REDACTED);
            }
            // Second chance for payloads the field-name heuristic missed.
            if BASE64_URL_VALUE.is_match(s) {
                return marker(BASE64_REDACTED);
            }
        }
    }

    value.clone()
}

/// Recursively sanitize structured content.
///
/// JSON-looking strings (leading `{` or `[`) are parsed and sanitized as
/// structure so JSON-encoded sensitive payloads are still redacted; parse
/// failures and prose strings pass through unchanged. Subtrees at or
/// beyond `policy.max_depth` are replaced wholesale with a depth marker.
pub fn sanitize_body(value: &Value, policy: &SanitizationPolicy, depth: usize) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) if depth >= policy.max_depth => {
            marker(MAX_DEPTH_EXCEEDED)
        }
        Value::String(s) => {
            let trimmed = s.trim_start();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                    return sanitize_body(&parsed, policy, depth);
                }
            }
            value.clone()
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(policy.max_array_len)
                .map(|item| sanitize_body(item, policy, depth + 1))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, val) in map {
                // Nested structure (including JSON-encoded strings) first,
                // then the same field-name/value heuristics as scalars.
                let nested = sanitize_body(val, policy, depth + 1);
                out.insert(key.clone(), sanitize_value(key, &nested, policy));
            }
            Value::Object(out)
        }
        _ => value.clone(),
    }
}

/// Redact a flat header map by name. No recursion; every value becomes a
/// string in the output (lossy for non-UTF-8 header bytes).
pub fn sanitize_headers(headers: &HeaderMap, policy: &SanitizationPolicy) -> Map<String, Value> {
    let mut out = Map::new();
    for (name, value) in headers {
        let rendered = if policy.is_sensitive_header(name.as_str()) {
            REDACTED.to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        out.insert(name.as_str().to_string(), Value::String(rendered));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::HeaderValue;
    use serde_json::json;

    fn policy() -> SanitizationPolicy {
        SanitizationPolicy::default()
    }

    #[test]
    fn test_sensitive_key_redacts_any_type() {
        assert_eq!(
            sanitize_value("password", &json!("p@ss1234"), &policy()),
            json!(REDACTED)
        );
        assert_eq!(
            sanitize_value("Token", &json!(12345), &policy()),
            json!(REDACTED)
        );
    }

    #[test]
    fn test_short_strings_skip_patterns() {
        let short_card = json!("4111-1111-1111-1111");
        assert_eq!(sanitize_value("note", &short_card, &policy()), short_card);
    }

    #[test]
    fn test_long_string_heuristic_order() {
        let pad = "x".repeat(100);

        let image = format!("data:image/png;base64,AAAA{pad}");
        assert_eq!(sanitize_value("file", &json!(image), &policy()), json!(IMAGE_REDACTED));

        // Field name containing "image" wins even without the data: prefix.
        let long_text = format!("{pad}{pad}");
        assert_eq!(
            sanitize_value("profileImage", &json!(long_text), &policy()),
            json!(IMAGE_REDACTED)
        );

        let card = format!("{pad} 4111 1111 1111 1111");
        assert_eq!(sanitize_value("note", &json!(card), &policy()), json!(CARD_REDACTED));

        let ssn = format!("{pad} 123-45-6789");
        assert_eq!(sanitize_value("note", &json!(ssn), &policy()), json!(SSN_REDACTED));

        let email = format!("{pad} ann@example.com");
        assert_eq!(sanitize_value("note", &json!(email), &policy()), json!(EMAIL_REDACTED));

        let b64 = "QUJa".repeat(40);
        assert_eq!(sanitize_value("blob", &json!(b64), &policy()), json!(BASE64_REDACTED));

        let b64url = "ab_-".repeat(40);
        assert_eq!(sanitize_value("blob", &json!(b64url), &policy()), json!(BASE64_REDACTED));
    }

    #[test]
    fn test_body_redacts_default_fields() {
        let body = json!({"password": "p@ss1234", "name": "Ann"});
        let out = sanitize_body(&body, &policy(), 0);
        assert_eq!(out, json!({"password": REDACTED, "name": "Ann"}));
    }

    #[test]
    fn test_json_encoded_string_is_sanitized() {
        let body = json!(r#"{"password":"p@ss1234","name":"Ann"}"#);
        let out = sanitize_body(&body, &policy(), 0);
        assert_eq!(out, json!({"password": REDACTED, "name": "Ann"}));
    }

    #[test]
    fn test_non_json_string_passes_through() {
        let body = json!("just some prose with password words");
        assert_eq!(sanitize_body(&body, &policy(), 0), body);
        let broken = json!("{not valid json");
        assert_eq!(sanitize_body(&broken, &policy(), 0), broken);
    }

    #[test]
    fn test_depth_bound_replaces_subtree() {
        let mut deep = json!("leaf");
        for _ in 0..15 {
            deep = json!({ "inner": deep });
        }
        let out = sanitize_body(&deep, &policy(), 0);
        let text = serde_json::to_string(&out).unwrap();
        assert!(text.contains(MAX_DEPTH_EXCEEDED));
        assert!(!text.contains("leaf"));
    }

    #[test]
    fn test_array_truncated_before_recursion() {
        let wide = json!(vec![json!({"n": 1}); 500]);
        let out = sanitize_body(&wide, &policy(), 0);
        assert_eq!(out.as_array().unwrap().len(), 100);
    }

    #[test]
    fn test_sensitive_key_redacts_whole_subtree() {
        let body = json!({"credentials": {"user": "a", "pass": "b"}});
        let out = sanitize_body(&body, &policy(), 0);
        assert_eq!(out, json!({"credentials": REDACTED}));
    }

    #[test]
    fn test_idempotent() {
        let body = json!({
            "password": "p@ss1234",
            "card": "4111 1111 1111 1111",
            "nested": {"ssn": "123-45-6789", "list": [1, 2, 3]},
        });
        let once = sanitize_body(&body, &policy(), 0);
        let twice = sanitize_body(&once, &policy(), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_headers_flat_redaction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let out = sanitize_headers(&headers, &policy());
        assert_eq!(out["authorization"], json!(REDACTED));
        assert_eq!(out["content-type"], json!("application/json"));
    }
}
