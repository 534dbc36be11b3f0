//! Shared utilities for the integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use slb_failover::control_plane::{
    BackendServer, ControlPlane, ControlPlaneError, ControlPlaneResult,
};

/// Start a mock probe endpoint that answers every request with the given
/// status. Returns the bound address.
pub async fn start_probe_endpoint(status: u16) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let status_text = match status {
                            200 => "200 OK",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_text
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock control-plane HTTP endpoint: GET answers with the given
/// member list as JSON, PUT is accepted after its body is drained.
pub async fn start_control_plane_endpoint(members: Vec<BackendServer>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let members = members.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let body = if request.starts_with("GET") {
                            serde_json::json!({ "members": members }).to_string()
                        } else {
                            String::new()
                        };
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read one full HTTP request (head plus Content-Length body) off the socket.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// In-process control plane holding one pool's member list.
pub struct FakeControlPlane {
    pool_id: String,
    members: Mutex<Vec<BackendServer>>,
    writes: AtomicU32,
    reject_writes: bool,
}

impl FakeControlPlane {
    pub fn new(pool_id: &str, members: Vec<BackendServer>) -> Self {
        Self {
            pool_id: pool_id.to_string(),
            members: Mutex::new(members),
            writes: AtomicU32::new(0),
            reject_writes: false,
        }
    }

    pub fn rejecting_writes(pool_id: &str, members: Vec<BackendServer>) -> Self {
        Self {
            reject_writes: true,
            ..Self::new(pool_id, members)
        }
    }

    pub fn write_count(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn members(&self) -> Vec<BackendServer> {
        self.members.lock().unwrap().clone()
    }
}

impl ControlPlane for FakeControlPlane {
    async fn get_backends(&self, pool_id: &str) -> ControlPlaneResult<Vec<BackendServer>> {
        if pool_id != self.pool_id {
            return Err(ControlPlaneError::PoolNotFound(pool_id.to_string()));
        }
        Ok(self.members.lock().unwrap().clone())
    }

    async fn set_backends(
        &self,
        pool_id: &str,
        members: &[BackendServer],
    ) -> ControlPlaneResult<()> {
        if pool_id != self.pool_id {
            return Err(ControlPlaneError::Apply(format!("no such pool {pool_id}")));
        }
        if self.reject_writes {
            return Err(ControlPlaneError::Apply("validation rejected".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.members.lock().unwrap() = members.to_vec();
        Ok(())
    }
}

pub fn member(id: &str, weight: u32) -> BackendServer {
    BackendServer {
        id: id.to_string(),
        weight,
    }
}
