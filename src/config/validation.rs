//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject configs that would produce mislabeled records downstream
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TracekitConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the shaper

use thiserror::Error;

use crate::config::schema::TracekitConfig;

/// A single semantic validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Every shaped record embeds the service name; without one the
    /// records are unattributable.
    #[error("service name must be set and non-empty")]
    MissingService,

    /// An empty project id would produce `projects//traces/...` paths.
    #[error("project_id must be non-empty when set")]
    EmptyProjectId,

    /// Blank entries in the sensitive lists match nothing and usually
    /// indicate a templating mistake in the config file.
    #[error("blank entry in {0} list")]
    BlankSensitiveEntry(&'static str),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &TracekitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.trim().is_empty() {
        errors.push(ValidationError::MissingService);
    }

    if matches!(&config.project_id, Some(p) if p.trim().is_empty()) {
        errors.push(ValidationError::EmptyProjectId);
    }

    if config.sensitive_fields.iter().any(|f| f.trim().is_empty()) {
        errors.push(ValidationError::BlankSensitiveEntry("sensitive_fields"));
    }

    if config.sensitive_headers.iter().any(|h| h.trim().is_empty()) {
        errors.push(ValidationError::BlankSensitiveEntry("sensitive_headers"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_service_rejected() {
        let config = TracekitConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingService));
    }

    #[test]
    fn test_valid_config_passes() {
        let config = TracekitConfig::for_service("api");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = TracekitConfig::default();
        config.project_id = Some("  ".into());
        config.sensitive_fields.push(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
