//! Primary-endpoint health probing.
//!
//! # Responsibilities
//! - Reachability check (TCP connect with a short timeout)
//! - Application-level HTTP probe with bounded retries
//! - Report a per-run `HealthStatus`, never an error
//!
//! # Design Decisions
//! - An unreachable host short-circuits to unhealthy without HTTP probing
//! - Probe failures are recorded and retried, never raised; this is the only
//!   retry loop in the system
//! - Worst-case wall time is bounded by
//!   reachability_timeout + retry_count x (timeout + interval)

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

use crate::config::ProbeConfig;

/// Outcome of one health probe, produced fresh each run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    /// Whether the primary endpoint answered an application probe.
    pub healthy: bool,

    /// Application probe attempts actually made (0 if unreachable).
    pub attempts_made: u32,

    /// Description of the most recent failed attempt, if any.
    pub last_error: Option<String>,
}

/// Probes the primary endpoint for liveness.
pub struct HealthProber {
    config: ProbeConfig,
    http: reqwest::Client,
}

impl HealthProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    /// Run the full probe: reachability first, then the HTTP probe with
    /// retries. Infallible; every failure mode degrades to `healthy = false`.
    /// Safe to call repeatedly, no side effects beyond the network calls.
    pub async fn probe(&self) -> HealthStatus {
        if let Err(reason) = self.reachable().await {
            tracing::warn!(host = %self.config.host, reason = %reason, "primary unreachable, skipping application probe");
            return HealthStatus {
                healthy: false,
                attempts_made: 0,
                last_error: Some(reason),
            };
        }

        let interval = Duration::from_millis(self.config.retry_interval_ms);
        let mut last_error = None;

        for attempt in 1..=self.config.retry_count {
            match self.http.get(&self.config.url).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(attempt, "primary health probe succeeded");
                    return HealthStatus {
                        healthy: true,
                        attempts_made: attempt,
                        last_error,
                    };
                }
                Ok(response) => {
                    let status = response.status();
                    tracing::warn!(attempt, status = %status, "health probe returned non-success status");
                    last_error = Some(format!("attempt {attempt}: status {status}"));
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "health probe request failed");
                    last_error = Some(format!("attempt {attempt}: {e}"));
                }
            }

            if attempt < self.config.retry_count {
                time::sleep(interval).await;
            }
        }

        tracing::error!(
            attempts = self.config.retry_count,
            "primary health probe exhausted all attempts"
        );
        HealthStatus {
            healthy: false,
            attempts_made: self.config.retry_count,
            last_error,
        }
    }

    /// Network-layer liveness: can we open a TCP connection within the
    /// reachability timeout.
    async fn reachable(&self) -> Result<(), String> {
        let timeout = Duration::from_secs(self.config.reachability_timeout_secs);
        match time::timeout(timeout, TcpStream::connect(&self.config.host)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(format!("{} unreachable: {e}", self.config.host)),
            Err(_) => Err(format!(
                "{} unreachable: connect timed out after {}s",
                self.config.host, self.config.reachability_timeout_secs
            )),
        }
    }
}
