//! Configuration schema definitions.
//!
//! This module defines the configuration consumed from the hosting
//! application. All types derive Serde traits for deserialization from
//! config files or inline construction.

use serde::{Deserialize, Serialize};

/// Target cloud vendor for trace propagation and log shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Google Cloud: W3C + `x-cloud-trace-context` propagation,
    /// `logging.googleapis.com/*` structured-log fields.
    #[default]
    Gcp,
    /// AWS: X-Ray `x-amzn-trace-id` propagation, flat CloudWatch-style
    /// records.
    Aws,
}

/// Root configuration for the observability core.
///
/// The vendor mode is plain data threaded through every call site; there
/// is no process-global default to race on. Set it once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracekitConfig {
    /// Active vendor mode.
    pub vendor: Vendor,

    /// Service name embedded in every shaped record. Required.
    pub service: String,

    /// GCP project id used to build the full trace resource path
    /// (`projects/{id}/traces/{trace_id}`). When absent, the raw trace
    /// id is emitted instead.
    pub project_id: Option<String>,

    /// Emit trace/span correlation fields in shaped records.
    pub include_trace: bool,

    /// Emit the GCP labels block (request id, service, log name).
    pub include_labels: bool,

    /// Field names redacted in addition to the built-in set
    /// (matched case-insensitively).
    pub sensitive_fields: Vec<String>,

    /// Header names redacted in addition to the built-in list
    /// (matched case-insensitively).
    pub sensitive_headers: Vec<String>,
}

impl Default for TracekitConfig {
    fn default() -> Self {
        Self {
            vendor: Vendor::default(),
            service: String::new(),
            project_id: None,
            include_trace: true,
            include_labels: true,
            sensitive_fields: Vec::new(),
            sensitive_headers: Vec::new(),
        }
    }
}

impl TracekitConfig {
    /// Minimal config for the given service name, GCP mode.
    pub fn for_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Self::default()
        }
    }
}
