//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::FailoverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FailoverConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FailoverConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read the control-plane bearer token from the configured environment
/// variable, if set. The value is handed straight to the client and never
/// logged.
pub fn load_token(config: &FailoverConfig) -> Option<String> {
    std::env::var(&config.control_plane.token_env)
        .ok()
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_rejects_invalid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // Parses fine but fails semantic validation (everything required empty).
        writeln!(file, "[probe]\nretry_count = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn load_roundtrips_valid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [policy]
            pool_id = "lb-1"
            primary_id = "i-a"
            backup_id = "i-b"

            [probe]
            url = "http://10.0.0.4/health.html"
            host = "10.0.0.4:80"

            [control_plane]
            base_url = "http://slb.internal/v1/"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.policy.pool_id, "lb-1");
        assert_eq!(config.policy.normal_primary_weight, 90);
    }
}
