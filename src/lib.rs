//! Per-request observability core.
//!
//! Establishes a distributed-tracing identity for every inbound unit of
//! work, propagates it across process boundaries in three vendor wire
//! formats (W3C Trace Context, Google Cloud Trace, AWS X-Ray), and shapes
//! arbitrary log records into vendor-specific structured-logging schemas
//! while redacting sensitive content.
//!
//! This crate performs no I/O: it produces correctly shaped, redacted
//! records and trace-identity objects. Storage, transport, batching, and
//! sampling decisions belong to the hosting application.

pub mod config;
pub mod context;
pub mod sanitize;
pub mod serialize;
pub mod shape;
pub mod trace;

pub use config::{load_config, ConfigError, TracekitConfig, Vendor};
pub use context::{ContextSnapshot, RequestContext};
pub use sanitize::{sanitize_body, sanitize_headers, sanitize_value, SanitizationPolicy};
pub use serialize::{serialize_error, serialize_request, serialize_response, ErrorReport};
pub use shape::LogShaper;
pub use trace::TraceIdentity;
