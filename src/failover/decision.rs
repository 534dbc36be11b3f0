//! Failover decision engine.
//!
//! Pure function from (health, current weights, policy) to target weights.
//! The two logical states are re-derived fresh each run from the probe
//! result; nothing is carried across runs here.

use crate::config::FailoverPolicy;

/// Logical state the pool should be steered toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailoverState {
    /// Primary healthy, traffic weighted toward the primary.
    Normal,
    /// Primary unhealthy, traffic weighted toward the backup.
    Fault,
}

impl FailoverState {
    pub fn from_health(healthy: bool) -> Self {
        if healthy {
            FailoverState::Normal
        } else {
            FailoverState::Fault
        }
    }
}

impl std::fmt::Display for FailoverState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailoverState::Normal => write!(f, "normal"),
            FailoverState::Fault => write!(f, "fault"),
        }
    }
}

/// Target weights for the managed pair plus the idempotence gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub state: FailoverState,
    pub target_primary: u32,
    pub target_backup: u32,
    /// True only if a write is needed to reach the target state.
    pub changed: bool,
}

/// Map the effective health state onto the configured weight pair.
///
/// `changed` is false when the control plane already reflects the target,
/// which is what makes repeated runs idempotent: no write is issued for a
/// pool that is already where it should be.
pub fn decide(
    healthy: bool,
    current_primary: u32,
    current_backup: u32,
    policy: &FailoverPolicy,
) -> Decision {
    let state = FailoverState::from_health(healthy);
    let (target_primary, target_backup) = match state {
        FailoverState::Normal => (policy.normal_primary_weight, policy.normal_backup_weight),
        FailoverState::Fault => (policy.fault_primary_weight, policy.fault_backup_weight),
    };

    Decision {
        state,
        target_primary,
        target_backup,
        changed: target_primary != current_primary || target_backup != current_backup,
    }
}
