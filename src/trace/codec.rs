//! Wire codecs for the three trace propagation formats.
//!
//! # Responsibilities
//! - Parse W3C `traceparent`/`tracestate`, Google `x-cloud-trace-context`,
//!   and AWS `x-amzn-trace-id` headers into a [`TraceIdentity`]
//! - Serialize an identity back into each wire format
//!
//! # Design Decisions
//! - No parse path ever fails: every malformed or missing header degrades
//!   to a freshly generated identity, so every request gets a valid one
//! - Incoming W3C/Cloud-Trace span ids are discarded and regenerated; a
//!   foreign span is never trusted as "current". X-Ray `Parent=` is the
//!   exception: it supplies the span id directly
//! - W3C→X-Ray conversion embeds the *current* epoch second because W3C
//!   ids carry no timestamp. The result is an approximation, good for
//!   correlation but not for temporal accuracy

use crate::config::Vendor;
use crate::trace::identity::{epoch_secs, random_hex, TraceIdentity};

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// True when the trace id is already in AWS X-Ray shape
/// (`1-{8 hex}-{24 hex}`).
pub fn is_aws_trace_id(trace_id: &str) -> bool {
    let mut parts = trace_id.split('-');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("1"), Some(ts), Some(rest), None)
            if ts.len() == 8 && rest.len() == 24 && is_lower_hex(ts) && is_lower_hex(rest)
    )
}

/// Normalize a trace id to 32 lowercase hex characters. AWS-shaped ids are
/// flattened (timestamp + entropy concatenated); anything shorter is
/// left-padded with zeros.
fn flatten_trace_id(trace_id: &str) -> String {
    if is_aws_trace_id(trace_id) {
        return trace_id[2..].replace('-', "");
    }
    if trace_id.len() >= 32 {
        trace_id[..32].to_string()
    } else {
        format!("{:0>32}", trace_id)
    }
}

/// Build an X-Ray root id from any internal trace id. Ids already in AWS
/// shape are reused verbatim; W3C-style ids get the current epoch second
/// as the embedded time component and their first 24 hex chars as the
/// entropy part (lossy, one-way).
pub fn xray_root(trace_id: &str) -> String {
    if is_aws_trace_id(trace_id) {
        trace_id.to_string()
    } else {
        let flat = flatten_trace_id(trace_id);
        format!("1-{:08x}-{}", epoch_secs(), &flat[..24])
    }
}

/// Parse a W3C `traceparent` header
/// (`{2 hex version}-{32 hex trace id}-{16 hex span id}-{2 hex flags}`).
/// Structural or charset mismatch falls back to a generated identity for
/// the given vendor mode. The incoming span id is discarded.
pub fn parse_traceparent(header: &str, vendor: Vendor) -> TraceIdentity {
    try_parse_traceparent(header).unwrap_or_else(|| {
        tracing::debug!(%header, "malformed traceparent, generating new identity");
        TraceIdentity::generate(vendor)
    })
}

fn try_parse_traceparent(header: &str) -> Option<TraceIdentity> {
    let parts: Vec<&str> = header.trim().split('-').collect();
    if parts.len() != 4 {
        return None;
    }
    let (version, trace_id, span_id, flags) = (parts[0], parts[1], parts[2], parts[3]);
    if version.len() != 2 || trace_id.len() != 32 || span_id.len() != 16 || flags.len() != 2 {
        return None;
    }
    if ![version, trace_id, span_id, flags].iter().all(|s| is_lower_hex(s)) {
        return None;
    }
    // An all-zero trace id is invalid per the W3C spec.
    if trace_id.bytes().all(|b| b == b'0') {
        return None;
    }
    let sampled = u8::from_str_radix(flags, 16).ok()? & 0x01 != 0;
    Some(TraceIdentity::new(
        trace_id.to_string(),
        random_hex(8),
        sampled,
    ))
}

/// Parse a Google `x-cloud-trace-context` header
/// (`{trace id}/{span id};o={0|1}`). Trace ids shorter than 32 hex chars
/// are left-padded; the span id is discarded. Malformed input falls back
/// to a generated GCP identity.
pub fn parse_cloud_trace_context(header: &str) -> TraceIdentity {
    try_parse_cloud_trace_context(header).unwrap_or_else(|| {
        tracing::debug!(%header, "malformed x-cloud-trace-context, generating new identity");
        TraceIdentity::generate(Vendor::Gcp)
    })
}

fn try_parse_cloud_trace_context(header: &str) -> Option<TraceIdentity> {
    let header = header.trim();
    let (ids, options) = match header.split_once(';') {
        Some((ids, opts)) => (ids, Some(opts)),
        None => (header, None),
    };
    let (trace_id, _span) = ids.split_once('/')?;
    if trace_id.is_empty() || trace_id.len() > 32 || !is_lower_hex(trace_id) {
        return None;
    }
    let sampled = matches!(options, Some("o=1"));
    Some(TraceIdentity::new(
        format!("{:0>32}", trace_id),
        random_hex(8),
        sampled,
    ))
}

/// Parse an AWS `x-amzn-trace-id` header: semicolon-separated `Key=Value`
/// pairs (quotes stripped). Requires a valid `Root=1-{8 hex}-{24 hex}`;
/// anything else falls back to a generated AWS identity. `Parent=`
/// supplies the span id (padded/truncated to 16 hex chars); `Sampled=0`
/// clears the sampled flag, anything else sets it.
pub fn parse_x_amzn_trace_id(header: &str) -> TraceIdentity {
    try_parse_x_amzn_trace_id(header).unwrap_or_else(|| {
        tracing::debug!(%header, "malformed x-amzn-trace-id, generating new identity");
        TraceIdentity::generate(Vendor::Aws)
    })
}

fn try_parse_x_amzn_trace_id(header: &str) -> Option<TraceIdentity> {
    let mut root = None;
    let mut parent = None;
    let mut sampled = None;

    for part in header.split(';') {
        let part = part.trim();
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"');
        match key.trim().to_ascii_lowercase().as_str() {
            "root" => root = Some(value.to_string()),
            "parent" => parent = Some(value.to_string()),
            "sampled" => sampled = Some(value.to_string()),
            _ => {}
        }
    }

    let root = root?;
    if !is_aws_trace_id(&root) {
        return None;
    }

    let span_id = match parent.filter(|p| is_lower_hex(p)) {
        Some(p) if p.len() > 16 => p[..16].to_string(),
        Some(p) => format!("{:0>16}", p),
        None => random_hex(8),
    };
    let sampled = sampled.as_deref() != Some("0");

    Some(TraceIdentity::new(root, span_id, sampled))
}

/// Parse a `tracestate` header: comma-separated `key=value` entries.
/// Invalid entries are skipped silently, never aborting the parse.
pub fn parse_tracestate(header: &str) -> Vec<(String, String)> {
    header
        .split(',')
        .filter_map(|entry| {
            let (key, value) = entry.trim().split_once('=')?;
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

impl TraceIdentity {
    /// Serialize as a W3C `traceparent` header. AWS-shaped trace ids are
    /// flattened to 32 hex so the output is always structurally valid.
    pub fn to_traceparent(&self) -> String {
        format!(
            "00-{}-{}-{:02x}",
            flatten_trace_id(self.trace_id()),
            self.span_id(),
            u8::from(self.sampled())
        )
    }

    /// Serialize as a `tracestate` header value; empty string when there
    /// are no entries.
    pub fn to_tracestate(&self) -> String {
        self.trace_state()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Serialize as a Google `x-cloud-trace-context` header. The span id
    /// is emitted in decimal per Google's header format.
    pub fn to_cloud_trace_header(&self) -> String {
        let span_decimal = u64::from_str_radix(self.span_id(), 16).unwrap_or(0);
        format!(
            "{}/{};o={}",
            flatten_trace_id(self.trace_id()),
            span_decimal,
            u8::from(self.sampled())
        )
    }

    /// Serialize as an AWS `x-amzn-trace-id` header. Trace ids already in
    /// X-Ray shape are reused verbatim; others are synthesized via
    /// [`xray_root`] (a documented approximation).
    pub fn to_x_amzn_trace_id(&self) -> String {
        format!(
            "Root={};Parent={};Sampled={}",
            xray_root(self.trace_id()),
            self.span_id(),
            u8::from(self.sampled())
        )
    }
}
