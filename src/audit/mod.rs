//! Append-only audit trail.
//!
//! # Data Flow
//! ```text
//! orchestrator events
//!     → record() stamps timestamp + run id, pushes to unbounded channel
//!     → writer task appends one line per event to the audit file
//! ```
//!
//! # Design Decisions
//! - The control path never blocks on audit IO; entries are handed to a
//!   write-behind task through an unbounded channel
//! - Writer errors are logged and dropped, never failing the run
//! - Lines are timestamped, human-readable, one event each; enough to
//!   reconstruct every decision after the fact

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::AuditConfig;

/// Handle to the audit trail. Cheap to share by reference; all methods are
/// non-blocking.
pub struct AuditLog {
    tx: Option<mpsc::UnboundedSender<String>>,
    worker: Option<JoinHandle<()>>,
}

impl AuditLog {
    /// Open the audit file and spawn the write-behind task. A disabled
    /// config yields an inert handle (events still reach tracing).
    pub fn open(config: &AuditConfig) -> Self {
        if !config.enabled {
            return Self {
                tx: None,
                worker: None,
            };
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let path = config.path.clone();

        let worker = tokio::spawn(async move {
            let mut file = match tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "cannot open audit file, audit trail disabled for this process");
                    // Drain so senders never see a closed channel as an error.
                    while rx.recv().await.is_some() {}
                    return;
                }
            };

            while let Some(line) = rx.recv().await {
                if let Err(e) = file.write_all(line.as_bytes()).await {
                    tracing::warn!(path = %path, error = %e, "audit write failed, entry dropped");
                }
            }
            let _ = file.flush().await;
        });

        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Append one event line. Never blocks, never fails the caller.
    pub fn record(&self, run_id: Uuid, message: &str) {
        tracing::info!(run_id = %run_id, "{message}");
        if let Some(tx) = &self.tx {
            let line = format!("{} [{}] {}\n", Utc::now().to_rfc3339(), run_id, message);
            let _ = tx.send(line);
        }
    }

    /// Close the channel and wait for buffered entries to hit disk. Called
    /// once at process exit; runs in flight are unaffected.
    pub async fn shutdown(mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_land_in_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");
        let audit = AuditLog::open(&AuditConfig {
            enabled: true,
            path: path.to_string_lossy().into_owned(),
        });

        let run_id = Uuid::new_v4();
        audit.record(run_id, "run started");
        audit.record(run_id, "no action needed");
        audit.shutdown().await;

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("run started"));
        assert!(lines[1].contains("no action needed"));
        assert!(lines[0].contains(&run_id.to_string()));
    }

    #[tokio::test]
    async fn disabled_audit_is_inert() {
        let audit = AuditLog::open(&AuditConfig {
            enabled: false,
            path: "/nonexistent/audit.log".into(),
        });
        audit.record(Uuid::new_v4(), "ignored");
        audit.shutdown().await;
    }
}
