use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

use crate::http::connection::Dispatcher;

/// Reported for peers that have no IPv4 address.
pub const NON_IPV4_CLIENT: &str = "0.0.0.0";

/// Pause after a failed accept so a persistent failure (e.g. out of file
/// descriptors) does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Dotted-quad form of the peer address used for policy and logs.
///
/// IPv4-mapped IPv6 peers are unwrapped; any other IPv6 peer becomes
/// [`NON_IPV4_CLIENT`].
pub fn client_ip(peer: &SocketAddr) -> String {
    match peer.ip() {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(|v4| v4.to_string())
            .unwrap_or_else(|| NON_IPV4_CLIENT.to_string()),
    }
}

pub struct Server {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    permits: Arc<Semaphore>,
}

impl Server {
    /// Binds the listening socket. Failure here is fatal to the process.
    pub async fn bind(
        addr: SocketAddr,
        dispatcher: Dispatcher,
        max_connections: usize,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            dispatcher: Arc::new(dispatcher),
            permits: Arc::new(Semaphore::new(max_connections)),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    ///
    /// Each connection runs on its own task while it holds a permit; when
    /// every permit is taken new connections are closed straight away.
    pub async fn run(self) -> anyhow::Result<()> {
        let logs = self.dispatcher.logs().clone();

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    logs.error(format!("failed to accept connection: {}", e)).await;
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            let ip = client_ip(&peer);
            tracing::debug!("Accepted connection from {}", peer);

            let permit = match self.permits.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    logs.error(format!(
                        "connection from {} dropped: connection limit reached",
                        ip
                    ))
                    .await;
                    drop(socket);
                    continue;
                }
            };

            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                dispatcher.dispatch(socket, &ip).await;
                drop(permit);
            });
        }
    }
}
