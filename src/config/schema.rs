//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the failover
//! controller. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

/// Root configuration for the failover controller.
///
/// Loaded once at process start and immutable thereafter; components receive
/// it explicitly through their constructors, never as ambient global state.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Which pool members are managed and which weights to steer between.
    pub policy: FailoverPolicy,

    /// Primary-endpoint health probe settings.
    pub probe: ProbeConfig,

    /// Control-plane endpoint settings.
    pub control_plane: ControlPlaneConfig,

    /// Opt-in flap suppression across runs.
    pub stability: StabilityConfig,

    /// Audit trail settings.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// The managed primary/backup pair and the two weight pairs to steer between.
///
/// The configured pairs are written verbatim; no sum constraint is enforced.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverPolicy {
    /// Pool/balancer identifier on the control plane.
    pub pool_id: String,

    /// Member id of the primary endpoint.
    pub primary_id: String,

    /// Member id of the backup endpoint.
    pub backup_id: String,

    /// Primary weight while the primary is healthy.
    pub normal_primary_weight: u32,

    /// Backup weight while the primary is healthy.
    pub normal_backup_weight: u32,

    /// Primary weight after failover.
    pub fault_primary_weight: u32,

    /// Backup weight after failover.
    pub fault_backup_weight: u32,
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self {
            pool_id: String::new(),
            primary_id: String::new(),
            backup_id: String::new(),
            normal_primary_weight: 90,
            normal_backup_weight: 10,
            fault_primary_weight: 0,
            fault_backup_weight: 100,
        }
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// URL for the application-level HTTP probe.
    pub url: String,

    /// `host:port` for the reachability check.
    pub host: String,

    /// Number of application probe attempts before concluding unhealthy.
    pub retry_count: u32,

    /// Sleep between probe attempts in milliseconds.
    pub retry_interval_ms: u64,

    /// Per-attempt HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Reachability check timeout in seconds.
    pub reachability_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: String::new(),
            retry_count: 3,
            retry_interval_ms: 2000,
            timeout_secs: 5,
            reachability_timeout_secs: 3,
        }
    }
}

/// Control-plane endpoint configuration.
///
/// Credentials are NOT part of the file: the bearer token is read from the
/// environment variable named by `token_env` at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API (e.g. "https://slb.internal/v1/").
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Environment variable holding the bearer token.
    pub token_env: String,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: 10,
            token_env: "SLB_FAILOVER_TOKEN".to_string(),
        }
    }
}

/// Flap suppression configuration.
///
/// With `threshold = 1` (the default) every run decides purely from its own
/// probe result and the state file is never touched. Thresholds above 1
/// require that many consecutive agreeing probes before the effective health
/// state flips, trading reaction time for oscillation resistance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Consecutive agreeing probes required to flip state.
    pub threshold: u32,

    /// Path of the JSON state file recording cross-run observations.
    pub state_path: String,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            state_path: "slb-failover-state.json".to_string(),
        }
    }
}

/// Audit trail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Enable the append-only audit file.
    pub enabled: bool,

    /// Audit file path.
    pub path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "slb-failover-audit.log".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_parses() {
        let doc = r#"
            [policy]
            pool_id = "lb-0042"
            primary_id = "i-primary"
            backup_id = "i-backup"
            normal_primary_weight = 90
            normal_backup_weight = 10
            fault_primary_weight = 0
            fault_backup_weight = 100

            [probe]
            url = "http://10.0.0.4/health.html"
            host = "10.0.0.4:80"
            retry_count = 3
            retry_interval_ms = 2000

            [control_plane]
            base_url = "https://slb.internal/v1/"

            [stability]
            threshold = 3

            [audit]
            path = "/var/log/slb-failover/audit.log"
        "#;

        let config: FailoverConfig = toml::from_str(doc).unwrap();
        assert_eq!(config.policy.pool_id, "lb-0042");
        assert_eq!(config.policy.fault_backup_weight, 100);
        assert_eq!(config.probe.retry_count, 3);
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.stability.threshold, 3);
        assert!(config.audit.enabled);
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let config: FailoverConfig = toml::from_str("").unwrap();
        assert_eq!(config.policy.normal_primary_weight, 90);
        assert_eq!(config.probe.retry_interval_ms, 2000);
        assert_eq!(config.stability.threshold, 1);
        assert_eq!(config.control_plane.token_env, "SLB_FAILOVER_TOKEN");
    }
}
