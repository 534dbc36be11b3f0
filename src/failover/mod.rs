//! Failover subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator.rs, once per invocation:
//!     health prober → HealthStatus
//!     control plane → PoolState (fresh, never cached)
//!     stability.rs  → effective health (inert at threshold 1)
//!     decision.rs   → Decision { targets, changed }
//!     changed?      → applier.rs (one full-pool write)
//!     every step    → audit trail
//! ```
//!
//! # Design Decisions
//! - decision.rs is pure; all IO lives at the edges
//! - `changed == false` short-circuits the write, making runs idempotent
//! - Cross-run memory exists only behind the opt-in stability filter

pub mod applier;
pub mod decision;
pub mod orchestrator;
pub mod stability;

pub use decision::{decide, Decision, FailoverState};
pub use orchestrator::{Orchestrator, RunOutcome, RunReport, StatusReport};
pub use stability::StabilityFilter;
