//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the managed pair is fully specified and distinct
//! - Validate value ranges (weights within 0..=100, counts and timeouts >= 1)
//! - Check probe and control-plane URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic violation found in a configuration document.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },

    #[error("primary_id and backup_id must name different pool members")]
    SameMember,

    #[error("'{field}' is {value}, weights must be within 0..=100")]
    WeightOutOfRange { field: &'static str, value: u32 },

    #[error("'{field}' must be at least 1")]
    ZeroCount { field: &'static str },

    #[error("'{field}' is not a valid URL: {reason}")]
    BadUrl { field: &'static str, reason: String },
}

/// Validate a loaded configuration, collecting every violation.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("policy.pool_id", &config.policy.pool_id),
        ("policy.primary_id", &config.policy.primary_id),
        ("policy.backup_id", &config.policy.backup_id),
        ("probe.url", &config.probe.url),
        ("probe.host", &config.probe.host),
        ("control_plane.base_url", &config.control_plane.base_url),
    ];
    for (field, value) in required {
        if value.is_empty() {
            errors.push(ValidationError::Empty { field });
        }
    }

    if !config.policy.primary_id.is_empty() && config.policy.primary_id == config.policy.backup_id {
        errors.push(ValidationError::SameMember);
    }

    let weights = [
        (
            "policy.normal_primary_weight",
            config.policy.normal_primary_weight,
        ),
        (
            "policy.normal_backup_weight",
            config.policy.normal_backup_weight,
        ),
        (
            "policy.fault_primary_weight",
            config.policy.fault_primary_weight,
        ),
        (
            "policy.fault_backup_weight",
            config.policy.fault_backup_weight,
        ),
    ];
    for (field, value) in weights {
        if value > 100 {
            errors.push(ValidationError::WeightOutOfRange { field, value });
        }
    }

    let counts = [
        ("probe.retry_count", u64::from(config.probe.retry_count)),
        ("probe.timeout_secs", config.probe.timeout_secs),
        (
            "probe.reachability_timeout_secs",
            config.probe.reachability_timeout_secs,
        ),
        (
            "control_plane.request_timeout_secs",
            config.control_plane.request_timeout_secs,
        ),
        ("stability.threshold", u64::from(config.stability.threshold)),
    ];
    for (field, value) in counts {
        if value == 0 {
            errors.push(ValidationError::ZeroCount { field });
        }
    }

    for (field, value) in [
        ("probe.url", &config.probe.url),
        ("control_plane.base_url", &config.control_plane.base_url),
    ] {
        if !value.is_empty() {
            if let Err(e) = value.parse::<Url>() {
                errors.push(ValidationError::BadUrl {
                    field,
                    reason: e.to_string(),
                });
            }
        }
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
    use crate::config::schema::FailoverConfig;

    fn valid_config() -> FailoverConfig {
        let mut config = FailoverConfig::default();
        config.policy.pool_id = "lb-1".into();
        config.policy.primary_id = "i-primary".into();
        config.policy.backup_id = "i-backup".into();
        config.probe.url = "http://10.0.0.4/health.html".into();
        config.probe.host = "10.0.0.4:80".into();
        config.control_plane.base_url = "http://slb.internal/v1/".into();
        config
    }

    #[test]
    fn accepts_complete_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let mut config = valid_config();
        config.policy.backup_id = "i-primary".into();
        config.policy.fault_backup_weight = 150;
        config.probe.retry_count = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::SameMember)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::WeightOutOfRange { value: 150, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::ZeroCount { .. })));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let mut config = valid_config();
        config.probe.timeout_secs = 0;
        config.probe.reachability_timeout_secs = 0;
        config.control_plane.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::ZeroCount { .. })));
    }

    #[test]
    fn rejects_unparseable_probe_url() {
        let mut config = valid_config();
        config.probe.url = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::BadUrl { field: "probe.url", .. })));
    }

    #[test]
    fn default_config_is_incomplete() {
        let errors = validate_config(&FailoverConfig::default()).unwrap_err();
        // All six required string fields are empty out of the box.
        assert_eq!(errors.len(), 6);
    }
}
