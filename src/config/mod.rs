//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or inline construction
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → TracekitConfig (validated, immutable)
//!     → passed by value/reference into shaper and context creation
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults except the service name
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{TracekitConfig, Vendor};
pub use validation::{validate_config, ValidationError};
