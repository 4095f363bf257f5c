//! Sanitization subsystem.
//!
//! # Data Flow
//! ```text
//! arbitrary nested data (serde_json::Value)
//!     → engine.rs (field-name redaction, value heuristics, bounds)
//!     → policy.rs (what is sensitive, how deep/wide to go)
//!     → patterns.rs (compiled-once regexes)
//!     → redacted Value, safe to embed in log records
//! ```
//!
//! # Design Decisions
//! - Strings at or under 100 chars are never pattern-matched (cost
//!   control; an accepted false-negative for short secrets)
//! - Depth/width bounds are unconditional, never "unlimited"

pub mod engine;
pub mod patterns;
pub mod policy;

pub use engine::{sanitize_body, sanitize_headers, sanitize_value, MAX_DEPTH_EXCEEDED, REDACTED};
pub use policy::SanitizationPolicy;
