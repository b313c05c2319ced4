use crate::broker::codec::{BrokerCodec, BrokerReply, BrokerRequest};
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::io;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

/// The single duplex connection to the trip-planning broker.
///
/// One channel per process; requests and replies are correlated by key, not
/// by ordering, so replies may arrive in any order relative to the requests
/// that caused them.
pub struct BrokerChannel {
    framed: Framed<TcpStream, BrokerCodec>,
}

impl BrokerChannel {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("could not connect to broker at {addr}"))?;
        Ok(Self::new(stream))
    }

    /// Wraps an already-connected stream. Used by tests to talk to an
    /// in-process fake broker.
    pub fn new(stream: TcpStream) -> Self {
        Self {
            framed: Framed::new(stream, BrokerCodec),
        }
    }

    pub async fn send(&mut self, request: BrokerRequest) -> Result<()> {
        self.framed
            .send(request)
            .await
            .context("broker send failed")
    }

    /// Receives the next reply. `None` means the broker hung up, which the
    /// gateway cannot recover from.
    pub async fn recv(&mut self) -> Option<io::Result<BrokerReply>> {
        self.framed.next().await
    }
}
