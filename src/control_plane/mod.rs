//! Control-plane access subsystem.
//!
//! # Data Flow
//! ```text
//! orchestrator
//!     → client.rs read_pool (one GET per run, no caching)
//!     → types.rs PoolState (validated snapshot)
//!     → applier builds updated list
//!     → client.rs set_backends (one full-pool PUT)
//! ```
//!
//! # Design Decisions
//! - The `ControlPlane` trait is the seam; tests swap in an in-process fake
//! - Errors distinguish auth, not-found, missing member, and transport
//! - State is owned by the control plane; nothing here survives a run

pub mod client;
pub mod types;

pub use client::{read_pool, ControlPlane, HttpControlPlane};
pub use types::{BackendServer, ControlPlaneError, ControlPlaneResult, PoolState};
