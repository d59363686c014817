//! Network infrastructure — implements `NetworkProbe` using `spawn_blocking`.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::NetworkProbe;

/// Per-connection attempt timeout; the overall polling budget lives in the
/// readiness service.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Production implementation that performs a real TCP connect.
pub struct TcpPortProbe;

impl NetworkProbe for TcpPortProbe {
    async fn check_tcp_connectivity(&self, host: &str, port: u16) -> Result<bool> {
        let host = host.to_owned();
        let result = tokio::task::spawn_blocking(move || {
            use std::net::{TcpStream, ToSocketAddrs};
            let Some(addr) = (host.as_str(), port)
                .to_socket_addrs()
                .map_err(|e| anyhow::anyhow!("resolving {host}:{port}: {e}"))?
                .next()
            else {
                anyhow::bail!("{host}:{port} resolved to no addresses");
            };
            Ok::<bool, anyhow::Error>(TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok())
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))??;
        Ok(result)
    }
}
