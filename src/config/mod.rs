//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FailoverConfig (validated, immutable)
//!     → passed explicitly into component constructors
//!
//! credentials:
//!     environment variable (named in [control_plane].token_env)
//!     → loader.rs at startup
//!     → control-plane client only, never logged
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and immutable for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_token, ConfigError};
pub use schema::{
    AuditConfig, ControlPlaneConfig, FailoverConfig, FailoverPolicy, ObservabilityConfig,
    ProbeConfig, StabilityConfig,
};
pub use validation::{validate_config, ValidationError};
