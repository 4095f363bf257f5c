//! Trace identity value type and random id generation.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use crate::config::Vendor;

/// The (trace id, span id, sampled flag, trace-state) tuple identifying
/// one distributed operation and one step within it.
///
/// Immutable after creation: deriving a child or re-parsing headers always
/// produces a fresh value. The trace id is preserved across the lifetime
/// of one logical request and all its children; the span id is freshly
/// generated on every derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceIdentity {
    trace_id: String,
    span_id: String,
    sampled: bool,
    trace_state: Vec<(String, String)>,
}

impl TraceIdentity {
    pub(crate) fn new(trace_id: String, span_id: String, sampled: bool) -> Self {
        Self {
            trace_id,
            span_id,
            sampled,
            trace_state: Vec::new(),
        }
    }

    /// Generate a fresh identity: random 128-bit trace id, random 64-bit
    /// span id. In AWS mode the trace id is emitted directly in X-Ray form
    /// (`1-{epoch secs hex}-{24 hex random}`); otherwise it is 32 lowercase
    /// hex characters with no embedded timestamp.
    ///
    /// Fresh identities default to sampled so newly minted requests always
    /// correlate logs to traces.
    pub fn generate(vendor: Vendor) -> Self {
        let trace_id = match vendor {
            Vendor::Aws => format!("1-{:08x}-{}", epoch_secs(), random_hex(12)),
            Vendor::Gcp => random_hex(16),
        };
        Self::new(trace_id, random_hex(8), true)
    }

    /// Same trace id, same trace-state entries, same sampled flag,
    /// brand-new random span id.
    pub fn derive_child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: random_hex(8),
            sampled: self.sampled,
            trace_state: self.trace_state.clone(),
        }
    }

    /// Vendor-dependent string form of the trace id.
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// 16 lowercase hex characters.
    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn sampled(&self) -> bool {
        self.sampled
    }

    /// Ordered, vendor-opaque key→value pairs.
    pub fn trace_state(&self) -> &[(String, String)] {
        &self.trace_state
    }

    /// Merge tracestate entries, last-write-wins per key, preserving the
    /// position of existing keys. Construction-time only.
    pub(crate) fn merge_trace_state(&mut self, entries: Vec<(String, String)>) {
        for (key, value) in entries {
            match self.trace_state.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => self.trace_state.push((key, value)),
            }
        }
    }
}

/// Seconds since the Unix epoch, saturating at zero on clock errors.
pub(crate) fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// `bytes` random bytes from a CSPRNG, lowercase hex encoded.
pub(crate) fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    #[test]
    fn test_generate_gcp_shape() {
        let id = TraceIdentity::generate(Vendor::Gcp);
        assert_eq!(id.trace_id().len(), 32);
        assert!(is_lower_hex(id.trace_id()));
        assert_eq!(id.span_id().len(), 16);
        assert!(is_lower_hex(id.span_id()));
        assert!(id.sampled());
    }

    #[test]
    fn test_generate_aws_shape() {
        let id = TraceIdentity::generate(Vendor::Aws);
        let parts: Vec<&str> = id.trace_id().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "1");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 24);
        assert!(is_lower_hex(parts[1]));
        assert!(is_lower_hex(parts[2]));
    }

    #[test]
    fn test_derive_child_shares_trace_not_span() {
        let parent = TraceIdentity::generate(Vendor::Gcp);
        let child = parent.derive_child();
        assert_eq!(child.trace_id(), parent.trace_id());
        assert_ne!(child.span_id(), parent.span_id());
        assert_eq!(child.sampled(), parent.sampled());
    }

    #[test]
    fn test_merge_trace_state_last_write_wins() {
        let mut id = TraceIdentity::generate(Vendor::Gcp);
        id.merge_trace_state(vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
        id.merge_trace_state(vec![("a".into(), "3".into())]);
        assert_eq!(
            id.trace_state(),
            &[("a".into(), "3".into()), ("b".into(), "2".into())]
        );
    }
}
