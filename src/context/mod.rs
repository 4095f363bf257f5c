//! Request context subsystem.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → request.rs (request id validation, identity derivation)
//!     → RequestContext (id + identity + monotonic clock + metadata)
//!     → snapshot() per log emission
//!     → child() per forked unit of work
//!     → add_trace_headers() on outbound calls
//! ```

pub mod request;

pub use request::{ContextSnapshot, RequestContext};
