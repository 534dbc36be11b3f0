//! Failover controller entry point.
//!
//! The binary is designed to be invoked repeatedly by an external scheduler
//! (`run`), with `watch` available where no scheduler exists. The exit code
//! reflects run success so scheduler-level alerting can key off it.
//!
//! Overlapping invocations are not mutually excluded: the read-modify-write
//! against the control plane is not transactional, so the scheduler must
//! guarantee non-overlapping runs. `watch` mode satisfies that by running
//! cycles strictly sequentially on one ticker.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slb_failover::audit::AuditLog;
use slb_failover::config::{load_config, load_token, FailoverConfig};
use slb_failover::control_plane::HttpControlPlane;
use slb_failover::failover::{Orchestrator, StabilityFilter};
use slb_failover::health::HealthProber;

#[derive(Parser)]
#[command(name = "slb-failover")]
#[command(about = "Health-triggered weight failover for load-balancer pools", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "failover.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one probe → decide → apply cycle
    Run,
    /// Execute cycles on a fixed interval until interrupted
    Watch {
        /// Seconds between cycle starts.
        #[arg(short, long, default_value_t = 30)]
        interval: u64,
    },
    /// Probe health and show current weights without writing anything
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cannot load {}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    tracing::info!(
        config = %cli.config.display(),
        pool = %config.policy.pool_id,
        "slb-failover starting"
    );

    let token = load_token(&config);
    if token.is_none() {
        tracing::warn!(
            var = %config.control_plane.token_env,
            "no control-plane token in environment, proceeding unauthenticated"
        );
    }

    let control = match HttpControlPlane::new(&config.control_plane, token) {
        Ok(control) => control,
        Err(e) => {
            tracing::error!(error = %e, "cannot build control-plane client");
            return ExitCode::FAILURE;
        }
    };
    let prober = match HealthProber::new(&config.probe) {
        Ok(prober) => prober,
        Err(e) => {
            tracing::error!(error = %e, "cannot build health prober");
            return ExitCode::FAILURE;
        }
    };
    let stability = StabilityFilter::new(&config.stability);
    let audit = AuditLog::open(&config.audit);

    let orchestrator = Orchestrator::new(&config.policy, &control, &prober, &stability, &audit);

    let code = match cli.command {
        Commands::Run => {
            let report = orchestrator.run().await;
            if report.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Watch { interval } => {
            let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received");
                    let _ = shutdown_tx.send(());
                }
            });
            if orchestrator
                .watch(Duration::from_secs(interval), shutdown_rx)
                .await
            {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Status => match orchestrator.status().await {
            Ok(status) => {
                println!(
                    "primary health: {} (attempts: {}{})",
                    if status.health.healthy { "healthy" } else { "unhealthy" },
                    status.health.attempts_made,
                    status
                        .health
                        .last_error
                        .as_deref()
                        .map(|e| format!(", last error: {e}"))
                        .unwrap_or_default()
                );
                println!(
                    "current weights: primary={} backup={} ({} members in pool)",
                    status.current_primary,
                    status.current_backup,
                    status.pool.len()
                );
                println!(
                    "pending action: {}",
                    if status.pending.changed {
                        format!(
                            "switch to primary={} backup={} ({})",
                            status.pending.target_primary,
                            status.pending.target_backup,
                            status.pending.state
                        )
                    } else {
                        "none, pool already at target".to_string()
                    }
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "status inspection failed");
                ExitCode::FAILURE
            }
        },
    };

    audit.shutdown().await;
    code
}

fn init_tracing(config: &FailoverConfig) {
    let default_filter = format!("slb_failover={}", config.observability.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
