//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! probe() per run:
//!     TCP connect to probe host (reachability, short timeout)
//!     → unreachable: healthy=false, no HTTP attempt
//!     → reachable: HTTP GET probe URL, up to retry_count attempts
//!       with retry_interval sleeps in between
//!     → HealthStatus { healthy, attempts_made, last_error }
//! ```
//!
//! # Design Decisions
//! - The prober never errors; degraded networks read as unhealthy
//! - A transient blip reading as unhealthy is an accepted false-positive
//!   risk, mitigated by the retry count (and optionally by the stability
//!   filter in the failover subsystem)

pub mod prober;

pub use prober::{HealthProber, HealthStatus};
