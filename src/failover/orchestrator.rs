//! Run orchestration.
//!
//! # Responsibilities
//! - Sequence probe → read → decide → apply once per invocation
//! - Audit every step with enough detail to reconstruct the decision
//! - Translate every terminal outcome into a `RunReport` for the caller
//!
//! # Design Decisions
//! - Strictly linear, run-to-completion; always terminates (the prober's
//!   bounded retry is the only retry anywhere)
//! - Read-phase failures abort before any decision; apply failures leave
//!   prior weights untouched
//! - No mutual exclusion between overlapping invocations; the external
//!   scheduler must not fire two runs concurrently

use std::time::Duration;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::audit::AuditLog;
use crate::config::FailoverPolicy;
use crate::control_plane::{read_pool, ControlPlane, ControlPlaneError, PoolState};
use crate::failover::applier::apply;
use crate::failover::decision::{decide, Decision};
use crate::failover::stability::StabilityFilter;
use crate::health::{HealthProber, HealthStatus};

/// Terminal outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Pool already reflects the target state; no write issued.
    NoActionNeeded,
    /// Weights were switched to the target state.
    Switched,
    /// The write was rejected; prior weights remain in effect.
    SwitchFailed(String),
    /// The pool could not be read; no decision was made.
    ReadFailed(String),
}

/// Everything one invocation learned and did.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub health: HealthStatus,
    /// (primary, backup) weights as read this run, if the read succeeded.
    pub prior_weights: Option<(u32, u32)>,
    pub decision: Option<Decision>,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn success(&self) -> bool {
        matches!(
            self.outcome,
            RunOutcome::NoActionNeeded | RunOutcome::Switched
        )
    }
}

/// Read-only pool inspection, produced by the `status` subcommand.
#[derive(Debug)]
pub struct StatusReport {
    pub health: HealthStatus,
    pub pool: PoolState,
    pub current_primary: u32,
    pub current_backup: u32,
    /// What a run would do right now (stability filter not consulted).
    pub pending: Decision,
}

/// Sequences one failover evaluation cycle. Holds no state between runs;
/// everything is re-read from the control plane each invocation.
pub struct Orchestrator<'a, C> {
    policy: &'a FailoverPolicy,
    control: &'a C,
    prober: &'a HealthProber,
    stability: &'a StabilityFilter,
    audit: &'a AuditLog,
}

impl<'a, C: ControlPlane> Orchestrator<'a, C> {
    pub fn new(
        policy: &'a FailoverPolicy,
        control: &'a C,
        prober: &'a HealthProber,
        stability: &'a StabilityFilter,
        audit: &'a AuditLog,
    ) -> Self {
        Self {
            policy,
            control,
            prober,
            stability,
            audit,
        }
    }

    /// Execute one full probe → read → decide → apply cycle.
    pub async fn run(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        self.audit.record(
            run_id,
            &format!(
                "run started: pool={} primary={} backup={}",
                self.policy.pool_id, self.policy.primary_id, self.policy.backup_id
            ),
        );

        let health = self.prober.probe().await;
        self.audit.record(
            run_id,
            &format!(
                "health probe: healthy={} attempts={} last_error={}",
                health.healthy,
                health.attempts_made,
                health.last_error.as_deref().unwrap_or("none")
            ),
        );

        let pool = match read_pool(self.control, self.policy).await {
            Ok(pool) => pool,
            Err(e) => {
                self.audit
                    .record(run_id, &format!("run aborted before decision: {e}"));
                return RunReport {
                    run_id,
                    health,
                    prior_weights: None,
                    decision: None,
                    outcome: RunOutcome::ReadFailed(e.to_string()),
                };
            }
        };

        // Presence of both members is guaranteed by read_pool.
        let current_primary = pool.weight_of(&self.policy.primary_id).unwrap_or_default();
        let current_backup = pool.weight_of(&self.policy.backup_id).unwrap_or_default();

        let effective_healthy = self.stability.filter(health.healthy);
        if effective_healthy != health.healthy {
            self.audit.record(
                run_id,
                &format!(
                    "stability filter holds effective health at {} despite probe",
                    if effective_healthy {
                        "healthy"
                    } else {
                        "unhealthy"
                    }
                ),
            );
        }

        let decision = decide(effective_healthy, current_primary, current_backup, self.policy);
        self.audit.record(
            run_id,
            &format!(
                "decision: state={} current=({current_primary},{current_backup}) target=({},{}) changed={}",
                decision.state, decision.target_primary, decision.target_backup, decision.changed
            ),
        );

        let outcome = if !decision.changed {
            self.audit.record(run_id, "no action needed");
            RunOutcome::NoActionNeeded
        } else {
            match apply(self.control, self.policy, &decision, &pool).await {
                Ok(()) => {
                    self.audit.record(
                        run_id,
                        &format!(
                            "switch succeeded: primary={} backup={}",
                            decision.target_primary, decision.target_backup
                        ),
                    );
                    RunOutcome::Switched
                }
                Err(e) => {
                    self.audit
                        .record(run_id, &format!("switch failed, prior weights stand: {e}"));
                    RunOutcome::SwitchFailed(e.to_string())
                }
            }
        };

        RunReport {
            run_id,
            health,
            prior_weights: Some((current_primary, current_backup)),
            decision: Some(decision),
            outcome,
        }
    }

    /// Run cycles sequentially on a fixed ticker until the shutdown signal
    /// fires. Returns whether the most recent cycle succeeded (true if none
    /// ran), so an interrupted watch still surfaces a failing pool through
    /// the exit code.
    pub async fn watch(&self, interval: Duration, mut shutdown: broadcast::Receiver<()>) -> bool {
        tracing::info!(interval_secs = interval.as_secs(), "watch mode starting");
        let mut ticker = tokio::time::interval(interval);
        let mut last_success = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.run().await;
                    last_success = report.success();
                    tracing::info!(
                        run_id = %report.run_id,
                        success = last_success,
                        outcome = ?report.outcome,
                        "cycle finished"
                    );
                }
                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, watch mode exiting");
                    break;
                }
            }
        }
        last_success
    }

    /// Probe and read without writing anything; for operator inspection.
    pub async fn status(&self) -> Result<StatusReport, ControlPlaneError> {
        let health = self.prober.probe().await;
        let pool = read_pool(self.control, self.policy).await?;

        let current_primary = pool.weight_of(&self.policy.primary_id).unwrap_or_default();
        let current_backup = pool.weight_of(&self.policy.backup_id).unwrap_or_default();
        let pending = decide(health.healthy, current_primary, current_backup, self.policy);

        Ok(StatusReport {
            health,
            pool,
            current_primary,
            current_backup,
            pending,
        })
    }
}
