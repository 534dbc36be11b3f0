//! Health-Triggered Traffic-Failover Controller
//!
//! Steers traffic between a primary and a backup pool member on an upstream
//! load-balancing control plane, based on a per-run health probe of the
//! primary endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!   scheduler (cron / `watch` mode)
//!        │ one invocation
//!        ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │                    orchestrator                      │
//!   │                                                      │
//!   │  ┌────────┐   ┌─────────────┐   ┌──────────┐         │
//!   │  │ health │──▶│control plane│──▶│ decision │──┐      │
//!   │  │ prober │   │  read pool  │   │  engine  │  │      │
//!   │  └────────┘   └─────────────┘   └──────────┘  │      │
//!   │                                   changed?    ▼      │
//!   │                               ┌──────────────────┐   │
//!   │                               │  weight applier  │   │
//!   │                               │ (full-pool PUT)  │   │
//!   │                               └──────────────────┘   │
//!   │                                                      │
//!   │  cross-cutting: config (immutable), audit trail,     │
//!   │  tracing, opt-in stability filter                    │
//!   └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each run is strictly linear and run-to-completion; the only durable state
//! is the control plane's own weight configuration, the audit log, and (only
//! when flap suppression is enabled) a small stability state file.

pub mod audit;
pub mod config;
pub mod control_plane;
pub mod failover;
pub mod health;

pub use audit::AuditLog;
pub use config::FailoverConfig;
pub use control_plane::{BackendServer, ControlPlane, ControlPlaneError, PoolState};
pub use failover::{Orchestrator, RunOutcome, RunReport, StabilityFilter};
pub use health::{HealthProber, HealthStatus};
