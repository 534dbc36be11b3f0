//! Cross-run flap suppression (opt-in).
//!
//! The base design decides from scratch every run, which means flapping
//! health can oscillate weights on every scheduled invocation. With
//! `[stability] threshold = K` (K > 1) the effective health state only flips
//! after K consecutive probes that disagree with it; until then the last
//! effective state holds. A small JSON state file carries the observation
//! counter between runs.
//!
//! With the default threshold of 1 the filter is inert and the state file is
//! never read or written. State-file IO problems degrade to the inert
//! behavior and never fail a run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StabilityConfig;
use crate::failover::decision::FailoverState;

#[derive(Debug, Serialize, Deserialize)]
struct StabilityRecord {
    /// The state the controller is currently steering toward.
    effective: FailoverState,
    /// Disagreeing state seen in recent runs, if any.
    candidate: Option<FailoverState>,
    /// Consecutive runs that observed `candidate`.
    consecutive: u32,
    updated_at: DateTime<Utc>,
}

/// Turns raw per-run probe results into an effective health state.
pub struct StabilityFilter {
    threshold: u32,
    path: PathBuf,
}

impl StabilityFilter {
    pub fn new(config: &StabilityConfig) -> Self {
        Self {
            threshold: config.threshold,
            path: PathBuf::from(&config.state_path),
        }
    }

    /// Fold the observed probe result into the persisted history and return
    /// the effective health state for this run.
    pub fn filter(&self, observed_healthy: bool) -> bool {
        if self.threshold <= 1 {
            return observed_healthy;
        }

        let observed = FailoverState::from_health(observed_healthy);
        let record = match self.load() {
            Some(record) => record,
            // First observation establishes the effective state directly.
            None => {
                self.store(&StabilityRecord {
                    effective: observed,
                    candidate: None,
                    consecutive: 0,
                    updated_at: Utc::now(),
                });
                return observed_healthy;
            }
        };

        let mut next = record;
        if observed == next.effective {
            next.candidate = None;
            next.consecutive = 0;
        } else {
            next.consecutive = if next.candidate == Some(observed) {
                next.consecutive + 1
            } else {
                next.candidate = Some(observed);
                1
            };
            if next.consecutive >= self.threshold {
                tracing::info!(
                    from = %next.effective,
                    to = %observed,
                    runs = next.consecutive,
                    "stability threshold reached, effective state flips"
                );
                next.effective = observed;
                next.candidate = None;
                next.consecutive = 0;
            } else {
                tracing::info!(
                    held = %next.effective,
                    observed = %observed,
                    runs = next.consecutive,
                    threshold = self.threshold,
                    "holding effective state pending consecutive observations"
                );
            }
        }
        next.updated_at = Utc::now();

        let effective = next.effective;
        self.store(&next);
        effective == FailoverState::Normal
    }

    fn load(&self) -> Option<StabilityRecord> {
        if !self.path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read stability state, treating as fresh");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt stability state, treating as fresh");
                None
            }
        }
    }

    fn store(&self, record: &StabilityRecord) {
        let serialized = match serde_json::to_string_pretty(record) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "cannot serialize stability state");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot persist stability state");
        }
    }
}
