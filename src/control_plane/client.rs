//! Control-plane client.
//!
//! # Responsibilities
//! - Fetch the full member list of a named pool
//! - Replace the full member list of a named pool
//! - Map HTTP failures onto the error taxonomy (auth / not-found / transport)
//!
//! # Design Decisions
//! - One attempt per call; retry policy belongs to the caller
//! - `set_backends` is a full-pool replacement, so read-then-write callers
//!   race against concurrent external mutators. Single-writer discipline is
//!   an external-scheduler precondition, not enforced here.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ControlPlaneConfig, FailoverPolicy};
use crate::control_plane::types::{BackendServer, ControlPlaneError, ControlPlaneResult, PoolState};

/// Read/write access to a pool's weighted member list.
///
/// Implemented by the HTTP client in production and by in-process fakes in
/// the integration tests.
#[allow(async_fn_in_trait)]
pub trait ControlPlane {
    /// Fetch the current member list of `pool_id`.
    async fn get_backends(&self, pool_id: &str) -> ControlPlaneResult<Vec<BackendServer>>;

    /// Replace the entire member list of `pool_id`.
    async fn set_backends(
        &self,
        pool_id: &str,
        members: &[BackendServer],
    ) -> ControlPlaneResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct MemberListBody {
    members: Vec<BackendServer>,
}

/// REST JSON control-plane client with optional bearer-token auth.
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpControlPlane {
    /// Build a client from configuration plus credentials sourced at startup.
    ///
    /// The token is never logged.
    pub fn new(config: &ControlPlaneConfig, token: Option<String>) -> ControlPlaneResult<Self> {
        let base_url: Url = config
            .base_url
            .parse()
            .map_err(|e| ControlPlaneError::Transport(format!("invalid control-plane URL: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn pool_url(&self, pool_id: &str) -> ControlPlaneResult<Url> {
        self.base_url
            .join(&format!("pools/{pool_id}/backends"))
            .map_err(|e| ControlPlaneError::Transport(format!("invalid pool URL: {e}")))
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl ControlPlane for HttpControlPlane {
    async fn get_backends(&self, pool_id: &str) -> ControlPlaneResult<Vec<BackendServer>> {
        let url = self.pool_url(pool_id)?;
        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ControlPlaneError::Auth(status.as_u16()));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ControlPlaneError::PoolNotFound(pool_id.to_string()));
        }
        if !status.is_success() {
            return Err(ControlPlaneError::Transport(format!(
                "control plane returned status {status}"
            )));
        }

        let body: MemberListBody = response
            .json()
            .await
            .map_err(|e| ControlPlaneError::Transport(format!("malformed member list: {e}")))?;
        Ok(body.members)
    }

    async fn set_backends(
        &self,
        pool_id: &str,
        members: &[BackendServer],
    ) -> ControlPlaneResult<()> {
        // Write-phase failures all count as apply failures, whatever the
        // underlying cause; the distinguishing detail goes in the message.
        let url = self
            .pool_url(pool_id)
            .map_err(|e| ControlPlaneError::Apply(e.to_string()))?;
        let body = MemberListBody {
            members: members.to_vec(),
        };

        let response = self
            .authorized(self.http.put(url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ControlPlaneError::Apply(format!("transport: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ControlPlaneError::Apply(format!(
                "status {status}: {detail}"
            )));
        }
        Ok(())
    }
}

/// Fetch the pool snapshot and verify both managed members are present.
///
/// A missing primary or backup is a fatal configuration/environment mismatch
/// (`Lookup`), aborting the run before any decision is made.
pub async fn read_pool<C: ControlPlane>(
    control: &C,
    policy: &FailoverPolicy,
) -> ControlPlaneResult<PoolState> {
    let members = control.get_backends(&policy.pool_id).await?;
    let pool = PoolState::from_members(members)?;

    for member in [&policy.primary_id, &policy.backup_id] {
        if pool.weight_of(member).is_none() {
            return Err(ControlPlaneError::Lookup {
                pool: policy.pool_id.clone(),
                member: member.clone(),
            });
        }
    }
    Ok(pool)
}
