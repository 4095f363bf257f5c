//! Sanitization policy: what gets redacted and how far recursion goes.

use std::collections::HashSet;

use crate::config::TracekitConfig;

/// Field names redacted regardless of value, matched case-insensitively.
const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "apikey",
    "api_key",
    "authorization",
    "auth",
    "credentials",
    "credit_card",
    "creditcard",
    "card_number",
    "cvv",
    "ssn",
    "pin",
    "private_key",
    "access_token",
    "refresh_token",
    "session_id",
    "cookie",
    "client_secret",
];

const DEFAULT_SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
    "x-csrf-token",
];

/// Immutable redaction policy. The depth/array bounds are the sole defense
/// against unbounded CPU/memory use on pathological input and are always
/// enforced; there is no "unlimited" setting.
#[derive(Debug, Clone)]
pub struct SanitizationPolicy {
    sensitive_fields: HashSet<String>,
    sensitive_headers: Vec<String>,
    pub max_depth: usize,
    pub max_array_len: usize,
    pub max_inline_string_len: usize,
}

impl Default for SanitizationPolicy {
    fn default() -> Self {
        Self {
            sensitive_fields: DEFAULT_SENSITIVE_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            sensitive_headers: DEFAULT_SENSITIVE_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            max_depth: 10,
            max_array_len: 100,
            max_inline_string_len: 1024,
        }
    }
}

impl SanitizationPolicy {
    /// Built-in defaults extended with the configured field/header names.
    pub fn from_config(config: &TracekitConfig) -> Self {
        let mut policy = Self::default();
        policy
            .sensitive_fields
            .extend(config.sensitive_fields.iter().map(|f| f.to_ascii_lowercase()));
        for header in &config.sensitive_headers {
            let header = header.to_ascii_lowercase();
            if !policy.sensitive_headers.contains(&header) {
                policy.sensitive_headers.push(header);
            }
        }
        policy
    }

    /// Exact case-insensitive key match.
    pub fn is_sensitive_field(&self, key: &str) -> bool {
        self.sensitive_fields.contains(&key.to_ascii_lowercase())
    }

    /// Exact case-insensitive header-name match.
    pub fn is_sensitive_header(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.sensitive_headers.iter().any(|h| *h == name)
    }
}
