//! Weight application.
//!
//! # Responsibilities
//! - Build the updated member list from a pool snapshot and a decision
//! - Issue one full-pool replacement write to the control plane
//!
//! # Design Decisions
//! - Members outside the managed pair are copied unchanged, in place; this
//!   is a partial update over an otherwise-immutable snapshot
//! - The write is atomic on the control-plane side: it either lands whole
//!   or is rejected, so a failed apply leaves prior weights untouched

use crate::config::FailoverPolicy;
use crate::control_plane::{BackendServer, ControlPlane, ControlPlaneResult, PoolState};
use crate::failover::decision::Decision;

/// Copy the snapshot, replacing only the two managed weights.
///
/// Order and every non-managed member's id and weight are preserved exactly.
pub fn updated_members(
    policy: &FailoverPolicy,
    decision: &Decision,
    pool: &PoolState,
) -> Vec<BackendServer> {
    pool.members()
        .iter()
        .map(|member| {
            let weight = if member.id == policy.primary_id {
                decision.target_primary
            } else if member.id == policy.backup_id {
                decision.target_backup
            } else {
                member.weight
            };
            BackendServer {
                id: member.id.clone(),
                weight,
            }
        })
        .collect()
}

/// Write the decision's target weights back to the control plane.
pub async fn apply<C: ControlPlane>(
    control: &C,
    policy: &FailoverPolicy,
    decision: &Decision,
    pool: &PoolState,
) -> ControlPlaneResult<()> {
    let members = updated_members(policy, decision, pool);
    control.set_backends(&policy.pool_id, &members).await
}
