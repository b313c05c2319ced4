use crate::broker::BrokerChannel;
use crate::config::Config;
use crate::server::event_loop::EventLoop;
use anyhow::{Context, Result, ensure};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

/// Binds the listener, connects the broker channel, and runs the event loop.
pub async fn run(cfg: &Config) -> Result<()> {
    ensure!(
        cfg.server.max_connections > 0,
        "max_connections must be at least 1"
    );

    let listener = bind(&cfg.server.listen_addr, cfg.server.backlog)?;
    info!("Listening on {}", cfg.server.listen_addr);

    let broker = BrokerChannel::connect(&cfg.broker.addr).await?;
    info!("Connected to broker at {}", cfg.broker.addr);

    EventLoop::new(
        listener,
        broker,
        cfg.server.max_connections,
        cfg.server.request_buffer_bytes,
    )
    .run()
    .await
}

/// Non-blocking listener with an explicit accept backlog. The backlog is
/// where clients queue while the connection table is at capacity.
fn bind(listen_addr: &str, backlog: u32) -> Result<TcpListener> {
    let addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {listen_addr}"))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("could not bind {listen_addr}"))?;
    socket.listen(backlog).context("listen failed")
}
