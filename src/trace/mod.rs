//! Trace identity subsystem.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → codec.rs (parse W3C / Cloud Trace / X-Ray, strict validation)
//!     → TraceIdentity (identity.rs, immutable value)
//!     → derive_child() per forked unit of work
//!     → codec.rs serializers (outbound propagation headers)
//! ```
//!
//! # Design Decisions
//! - Parsers never fail: malformed input degrades to a generated identity
//! - Span ids from untrusted input are regenerated (X-Ray Parent excepted)
//! - Ids come from a CSPRNG; trace/span/request ids must not be predictable

pub mod codec;
pub mod identity;

pub use codec::{
    is_aws_trace_id, parse_cloud_trace_context, parse_tracestate, parse_traceparent,
    parse_x_amzn_trace_id, xray_root,
};
pub use identity::TraceIdentity;
