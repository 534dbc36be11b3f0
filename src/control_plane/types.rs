//! Pool member types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single member of a load-balancer pool as reported by the control plane.
///
/// Identity is `id`; `weight` is the only mutable attribute this controller
/// ever touches, and only for the two managed members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendServer {
    /// Control-plane identifier of the pool member.
    pub id: String,

    /// Traffic share in [0, 100] relative to the other members.
    pub weight: u32,
}

/// Snapshot of one pool's member list, fetched fresh on every run.
///
/// Order is exactly what the control plane returned; members that are not
/// the managed primary/backup pair pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    members: Vec<BackendServer>,
}

impl PoolState {
    /// Build a snapshot from a control-plane response, rejecting duplicate ids.
    pub fn from_members(members: Vec<BackendServer>) -> Result<Self, ControlPlaneError> {
        for (i, member) in members.iter().enumerate() {
            if members[..i].iter().any(|m| m.id == member.id) {
                return Err(ControlPlaneError::Transport(format!(
                    "control plane returned duplicate pool member id '{}'",
                    member.id
                )));
            }
        }
        Ok(Self { members })
    }

    /// Current weight of the member with the given id, if present.
    pub fn weight_of(&self, id: &str) -> Option<u32> {
        self.members.iter().find(|m| m.id == id).map(|m| m.weight)
    }

    pub fn members(&self) -> &[BackendServer] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Errors surfaced by control-plane operations.
///
/// `Lookup` is a fatal configuration/environment mismatch: a managed member
/// the operator named is simply not in the pool. It is never papered over
/// with defaults.
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    /// Network failure or malformed/erroring control-plane response.
    #[error("control plane transport failure: {0}")]
    Transport(String),

    /// Credentials rejected by the control plane.
    #[error("control plane rejected credentials (status {0})")]
    Auth(u16),

    /// The configured pool does not exist on the control plane.
    #[error("pool '{0}' not found on control plane")]
    PoolNotFound(String),

    /// A managed member is missing from the fetched pool.
    #[error("expected pool member '{member}' missing from pool '{pool}'")]
    Lookup { pool: String, member: String },

    /// The weight update write was rejected.
    #[error("control plane rejected weight update: {0}")]
    Apply(String),
}

/// Result type for control-plane operations.
pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, weight: u32) -> BackendServer {
        BackendServer {
            id: id.to_string(),
            weight,
        }
    }

    #[test]
    fn pool_state_preserves_order_and_weights() {
        let pool =
            PoolState::from_members(vec![member("a", 10), member("b", 20), member("c", 70)])
                .unwrap();

        assert_eq!(pool.weight_of("b"), Some(20));
        assert_eq!(pool.weight_of("missing"), None);
        let ids: Vec<&str> = pool.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn pool_state_rejects_duplicate_ids() {
        let err = PoolState::from_members(vec![member("a", 10), member("a", 90)]).unwrap_err();
        assert!(matches!(err, ControlPlaneError::Transport(_)));
    }
}
