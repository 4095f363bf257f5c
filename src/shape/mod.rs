//! Log shaping subsystem.
//!
//! # Data Flow
//! ```text
//! flat log record (Map<String, Value>)
//!     + ContextSnapshot (correlation fields)
//!     + vendor selection (per-call override, else configured default)
//!     → gcp.rs or aws.rs
//!     → one structured record, handed off to the transport collaborator
//! ```
//!
//! # Design Decisions
//! - Unrecognized fields pass through unchanged (forward-compatible)
//! - The shaper never fails; worst case is a degraded-but-valid record
//! - Missing service name is rejected at construction, not per call

pub mod aws;
pub mod gcp;
pub mod severity;

use serde_json::{Map, Value};

use crate::config::{validate_config, ConfigError, TracekitConfig, Vendor};
use crate::context::ContextSnapshot;

/// Converts flat log records into the target vendor's structured schema.
#[derive(Debug, Clone)]
pub struct LogShaper {
    config: TracekitConfig,
}

impl LogShaper {
    /// Build a shaper from validated configuration. Rejects configs that
    /// would produce mislabeled records (e.g. no service name).
    pub fn new(config: TracekitConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TracekitConfig {
        &self.config
    }

    /// Shape one record. The per-call vendor override beats the configured
    /// default; correlation fields absent from the record are filled from
    /// the context snapshot when one is given.
    pub fn shape(
        &self,
        record: Map<String, Value>,
        ctx: Option<&ContextSnapshot>,
        vendor: Option<Vendor>,
    ) -> Map<String, Value> {
        match vendor.unwrap_or(self.config.vendor) {
            Vendor::Gcp => gcp::shape(record, &self.config, ctx),
            Vendor::Aws => aws::shape(record, &self.config, ctx),
        }
    }
}
