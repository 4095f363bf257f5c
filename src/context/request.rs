//! Request-scoped context: request id, trace identity, clock, metadata.
//!
//! # Responsibilities
//! - Derive the request id and trace identity from inbound headers
//! - Measure elapsed time on a monotonic clock
//! - Inject outbound propagation headers for the active vendor
//! - Fork child contexts for nested units of work
//!
//! # Design Decisions
//! - Request id is added as early as possible for correlation
//! - Externally supplied request ids are only trusted when they already
//!   match the canonical 8-lowercase-hex shape
//! - One context per logical unit of work; children are forked explicitly,
//!   never shared implicitly

use std::collections::HashMap;
use std::time::Instant;

use http::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::Vendor;
use crate::trace::codec::{
    parse_cloud_trace_context, parse_tracestate, parse_traceparent, parse_x_amzn_trace_id,
};
use crate::trace::identity::random_hex;
use crate::trace::TraceIdentity;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const TRACEPARENT: &str = "traceparent";
pub const TRACESTATE: &str = "tracestate";
pub const X_CLOUD_TRACE_CONTEXT: &str = "x-cloud-trace-context";
pub const X_AMZN_TRACE_ID: &str = "x-amzn-trace-id";

/// Context bound to one inbound unit of work.
#[derive(Debug)]
pub struct RequestContext {
    request_id: String,
    identity: TraceIdentity,
    vendor: Vendor,
    start: Instant,
    metadata: HashMap<String, Value>,
}

/// Cheap read-only view consumed by every log emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub request_id: String,
    pub trace_id: String,
    pub span_id: String,
    pub sampled: bool,
    /// Elapsed milliseconds at snapshot time, two decimals.
    pub elapsed_ms: String,
}

impl RequestContext {
    /// Create a context from inbound headers.
    ///
    /// The trace identity is derived from the vendor-appropriate header in
    /// priority order: vendor-specific header (AWS `x-amzn-trace-id`,
    /// else `x-cloud-trace-context`) → W3C `traceparent` → freshly
    /// generated. A `tracestate` header, when present, is merged into the
    /// identity regardless of which source won.
    pub fn new(headers: &HeaderMap, vendor: Vendor) -> Self {
        let request_id = header_str(headers, X_REQUEST_ID)
            .filter(|id| is_valid_request_id(id))
            .map(str::to_string)
            .unwrap_or_else(|| random_hex(4));

        let mut identity = derive_identity(headers, vendor);
        if let Some(state) = header_str(headers, TRACESTATE) {
            identity.merge_trace_state(parse_tracestate(state));
        }

        Self {
            request_id,
            identity,
            vendor,
            start: Instant::now(),
            metadata: HashMap::new(),
        }
    }

    /// 8 lowercase hex characters, stable for the life of the request.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn identity(&self) -> &TraceIdentity {
        &self.identity
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Time since creation on the monotonic clock, millisecond precision
    /// to two decimals (e.g. `"12.34"`).
    pub fn elapsed_ms(&self) -> String {
        format!("{:.2}", self.start.elapsed().as_secs_f64() * 1000.0)
    }

    /// Populate outbound propagation headers for the active vendor.
    /// Always sets `x-request-id`; GCP mode adds `traceparent`,
    /// `tracestate` (when non-empty) and `x-cloud-trace-context`, AWS
    /// mode adds `x-amzn-trace-id`.
    pub fn add_trace_headers(&self, headers: &mut HeaderMap) {
        insert_str(headers, X_REQUEST_ID, &self.request_id);
        match self.vendor {
            Vendor::Gcp => {
                insert_str(headers, TRACEPARENT, &self.identity.to_traceparent());
                let state = self.identity.to_tracestate();
                if !state.is_empty() {
                    insert_str(headers, TRACESTATE, &state);
                }
                insert_str(
                    headers,
                    X_CLOUD_TRACE_CONTEXT,
                    &self.identity.to_cloud_trace_header(),
                );
            }
            Vendor::Aws => {
                insert_str(headers, X_AMZN_TRACE_ID, &self.identity.to_x_amzn_trace_id());
            }
        }
    }

    /// Fork a context for a nested unit of work: same request id, a
    /// derived child span, and a copy of the metadata taken at fork time.
    /// Later mutations are invisible in both directions.
    pub fn child(&self) -> Self {
        Self {
            request_id: self.request_id.clone(),
            identity: self.identity.derive_child(),
            vendor: self.vendor,
            start: Instant::now(),
            metadata: self.metadata.clone(),
        }
    }

    /// Free-form sidecar storage, last-write-wins.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Correlation fields for the log shaper.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            request_id: self.request_id.clone(),
            trace_id: self.identity.trace_id().to_string(),
            span_id: self.identity.span_id().to_string(),
            sampled: self.identity.sampled(),
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

fn derive_identity(headers: &HeaderMap, vendor: Vendor) -> TraceIdentity {
    match vendor {
        Vendor::Aws => {
            if let Some(h) = header_str(headers, X_AMZN_TRACE_ID) {
                return parse_x_amzn_trace_id(h);
            }
        }
        Vendor::Gcp => {
            if let Some(h) = header_str(headers, X_CLOUD_TRACE_CONTEXT) {
                return parse_cloud_trace_context(h);
            }
        }
    }
    if let Some(h) = header_str(headers, TRACEPARENT) {
        return parse_traceparent(h, vendor);
    }
    TraceIdentity::generate(vendor)
}

fn is_valid_request_id(id: &str) -> bool {
    id.len() == 8 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn insert_str(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_valid_request_id_is_kept() {
        let ctx = RequestContext::new(&headers(&[("x-request-id", "deadbeef")]), Vendor::Gcp);
        assert_eq!(ctx.request_id(), "deadbeef");
    }

    #[test]
    fn test_invalid_request_id_is_replaced() {
        for bad in ["DEADBEEF", "short", "deadbeefcafe", "deadbee!"] {
            let ctx = RequestContext::new(&headers(&[("x-request-id", bad)]), Vendor::Gcp);
            assert_ne!(ctx.request_id(), bad);
            assert!(is_valid_request_id(ctx.request_id()), "got {}", ctx.request_id());
        }
    }

    #[test]
    fn test_vendor_header_beats_traceparent() {
        let map = headers(&[
            ("x-cloud-trace-context", "4bf92f3577b34da6a3ce929d0e0e4736/1;o=1"),
            ("traceparent", "00-aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa-00f067aa0ba902b7-01"),
        ]);
        let ctx = RequestContext::new(&map, Vendor::Gcp);
        assert_eq!(ctx.identity().trace_id(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[test]
    fn test_traceparent_used_when_vendor_header_absent() {
        let map = headers(&[(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        )]);
        let ctx = RequestContext::new(&map, Vendor::Aws);
        assert_eq!(ctx.identity().trace_id(), "4bf92f3577b34da6a3ce929d0e0e4736");
    }

    #[test]
    fn test_tracestate_merged() {
        let map = headers(&[
            ("traceparent", "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
            ("tracestate", "vendor=abc,other=1"),
        ]);
        let ctx = RequestContext::new(&map, Vendor::Gcp);
        assert_eq!(ctx.identity().trace_state().len(), 2);
    }

    #[test]
    fn test_child_shares_request_id_not_span() {
        let mut parent = RequestContext::new(&HeaderMap::new(), Vendor::Gcp);
        parent.set_metadata("user", json!("ann"));
        let mut child = parent.child();

        assert_eq!(child.request_id(), parent.request_id());
        assert_eq!(child.identity().trace_id(), parent.identity().trace_id());
        assert_ne!(child.identity().span_id(), parent.identity().span_id());

        // Fork-time copy; mutations stay private to each side.
        assert_eq!(child.get_metadata("user"), Some(&json!("ann")));
        child.set_metadata("user", json!("bob"));
        assert_eq!(parent.get_metadata("user"), Some(&json!("ann")));
    }

    #[test]
    fn test_add_trace_headers_gcp() {
        let ctx = RequestContext::new(&HeaderMap::new(), Vendor::Gcp);
        let mut out = HeaderMap::new();
        ctx.add_trace_headers(&mut out);
        assert_eq!(out.get(X_REQUEST_ID).unwrap(), ctx.request_id());
        assert!(out.contains_key(TRACEPARENT));
        assert!(out.contains_key(X_CLOUD_TRACE_CONTEXT));
        assert!(!out.contains_key(X_AMZN_TRACE_ID));
        // No tracestate entries, so no tracestate header.
        assert!(!out.contains_key(TRACESTATE));
    }

    #[test]
    fn test_add_trace_headers_aws() {
        let ctx = RequestContext::new(&HeaderMap::new(), Vendor::Aws);
        let mut out = HeaderMap::new();
        ctx.add_trace_headers(&mut out);
        assert!(out.contains_key(X_REQUEST_ID));
        assert!(out.contains_key(X_AMZN_TRACE_ID));
        assert!(!out.contains_key(TRACEPARENT));
    }

    #[test]
    fn test_elapsed_ms_two_decimals() {
        let ctx = RequestContext::new(&HeaderMap::new(), Vendor::Gcp);
        let elapsed = ctx.elapsed_ms();
        let (_, decimals) = elapsed.split_once('.').expect("decimal point");
        assert_eq!(decimals.len(), 2);
        assert!(elapsed.parse::<f64>().unwrap() >= 0.0);
    }

    #[test]
    fn test_snapshot_matches_context() {
        let ctx = RequestContext::new(&HeaderMap::new(), Vendor::Gcp);
        let snap = ctx.snapshot();
        assert_eq!(snap.request_id, ctx.request_id());
        assert_eq!(snap.trace_id, ctx.identity().trace_id());
        assert_eq!(snap.span_id, ctx.identity().span_id());
    }
}
