//! The connection-multiplexing event loop.
//!
//! One task owns everything: the listener, the broker channel, the connection
//! table and its buffers, the removal queue, and the sockets parked while
//! their reply is being computed. Each iteration waits on all event sources
//! at once and handles them in fixed priority order — broker reply, then new
//! connection, then open-connection input — and finishes by draining the
//! removal queue. Nothing here blocks on an individual socket.

use crate::broker::{BrokerChannel, BrokerReply, BrokerRequest, RequestRecord};
use crate::http::parser::{self, Feed};
use crate::http::request::RequestLine;
use crate::http::response::{ERROR_404, OK_TEXT_PLAIN};
use crate::server::conn_table::{ConnTable, RemovalQueue};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// What one iteration of the wait produced.
enum Event {
    Reply(Option<io::Result<BrokerReply>>),
    Inbound(io::Result<(TcpStream, SocketAddr)>),
    ConnReadable(io::Result<usize>),
}

pub struct EventLoop {
    listener: TcpListener,
    broker: BrokerChannel,
    table: ConnTable,
    removals: RemovalQueue,
    /// Sockets whose request is at the broker, keyed by correlation ticket.
    /// A socket lives here from dispatch until its reply is written.
    awaiting: HashMap<u64, TcpStream>,
    next_ticket: u64,
    /// Read scratch, sized to the request buffer so a single read can fill
    /// whatever room a slot has left.
    scratch: Vec<u8>,
}

impl EventLoop {
    pub fn new(
        listener: TcpListener,
        broker: BrokerChannel,
        max_connections: usize,
        buffer_bytes: usize,
    ) -> Self {
        Self {
            listener,
            broker,
            table: ConnTable::new(max_connections, buffer_bytes),
            removals: RemovalQueue::new(),
            awaiting: HashMap::new(),
            next_ticket: 0,
            scratch: vec![0u8; buffer_bytes],
        }
    }

    /// Runs forever. Returns only on an unrecoverable wait failure: the
    /// broker channel erroring out or hanging up. Per-connection failures
    /// never escalate past "close that connection".
    pub async fn run(mut self) -> Result<()> {
        info!("event loop running");
        loop {
            // Listener readiness is only armed while below capacity: once the
            // table is full, pending connections wait in the accept backlog
            // instead of growing the table.
            let event = tokio::select! {
                biased;

                reply = self.broker.recv() => Event::Reply(reply),

                inbound = self.listener.accept(), if self.table.has_capacity() => {
                    Event::Inbound(inbound)
                }

                ready = self.table.readable(), if !self.table.is_empty() => {
                    Event::ConnReadable(ready)
                }
            };

            match event {
                Event::Reply(reply) => self.handle_reply(reply).await?,
                Event::Inbound(inbound) => self.handle_inbound(inbound),
                Event::ConnReadable(ready) => {
                    ready.context("connection readiness wait failed")?;
                    self.sweep().await;
                }
            }

            self.removals.drain(&mut self.table);
        }
    }

    /// Relays one broker reply to the socket that originated the request,
    /// then closes it. A vanished target or a failed write costs that client
    /// its reply and nothing else.
    async fn handle_reply(&mut self, reply: Option<io::Result<BrokerReply>>) -> Result<()> {
        let reply = reply
            .context("broker channel closed")?
            .context("broker channel receive failed")?;

        let Some(mut stream) = self.awaiting.remove(&reply.key) else {
            warn!(ticket = reply.key, "reply target vanished, dropping reply");
            return Ok(());
        };

        debug!(ticket = reply.key, bytes = reply.text.len(), "relaying broker reply");
        let write = async {
            stream.write_all(OK_TEXT_PLAIN).await?;
            stream.write_all(reply.text.as_bytes()).await
        };
        if let Err(e) = write.await {
            warn!(ticket = reply.key, error = %e, "reply write failed, client loses reply");
        }
        // stream drops here, closing the connection
        Ok(())
    }

    fn handle_inbound(&mut self, inbound: io::Result<(TcpStream, SocketAddr)>) {
        let (stream, peer) = match inbound {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "accept failed");
                return;
            }
        };
        match self.table.add(stream) {
            Ok(slot) => {
                debug!(%peer, slot, active = self.table.len(), "accepted connection");
            }
            Err(_) => {
                // The capacity guard on accept should make this unreachable.
                warn!(%peer, "connection table full, dropping accepted connection");
            }
        }
    }

    /// One pass over the table in slot order, servicing every connection with
    /// available input. Removals discovered along the way are queued, never
    /// applied, so slot indices stay stable for the whole pass.
    async fn sweep(&mut self) {
        for slot in 0..self.table.len() {
            self.service_slot(slot).await;
        }
    }

    async fn service_slot(&mut self, slot: usize) {
        let Some(conn) = self.table.get_mut(slot) else {
            return;
        };
        let Some(stream) = conn.stream() else {
            // Socket already handed off or closed earlier in this pass.
            return;
        };

        let room = conn.buf().remaining();
        let n = match stream.try_read(&mut self.scratch[..room]) {
            Ok(0) => {
                // Readiness plus a zero-byte read means the peer closed.
                debug!(slot, "peer closed before completing a request");
                conn.take_stream();
                self.removals.enqueue(slot);
                return;
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
            Err(e) => {
                warn!(slot, error = %e, "connection read failed");
                conn.take_stream();
                self.removals.enqueue(slot);
                return;
            }
        };

        match parser::feed(conn.buf_mut(), &self.scratch[..n]) {
            Feed::NeedMore => {}
            Feed::TooLong => {
                warn!(slot, "request line exceeds buffer capacity");
                self.reject(slot).await;
            }
            Feed::LineComplete => self.dispatch(slot).await,
        }
    }

    /// Handles a completed request line: forward the query to the broker and
    /// park the socket until the reply arrives, or reject the request. Both
    /// paths enqueue the slot for removal exactly once.
    async fn dispatch(&mut self, slot: usize) {
        let parsed = {
            let Some(conn) = self.table.get_mut(slot) else {
                return;
            };
            RequestLine::parse(conn.buf().as_bytes()).map(|line| {
                debug!(slot, resource = line.resource(), "dispatching request");
                RequestRecord::from_query(line.query())
            })
        };

        let record = match parsed {
            Ok(record) => record,
            Err(err) => {
                debug!(slot, ?err, "malformed request");
                self.reject(slot).await;
                return;
            }
        };

        let Some(stream) = self.table.get_mut(slot).and_then(|c| c.take_stream()) else {
            return;
        };
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        match self.broker.send(BrokerRequest { key: ticket, record }).await {
            Ok(()) => {
                self.awaiting.insert(ticket, stream);
                debug!(slot, ticket, in_flight = self.awaiting.len(), "request sent to broker");
            }
            Err(e) => {
                // The client sees a bare close, same as a lost reply.
                warn!(slot, ticket, error = %e, "broker send failed, dropping request");
            }
        }
        self.removals.enqueue(slot);
    }

    /// Sends the fixed 404 page, closes the socket, and queues the slot.
    async fn reject(&mut self, slot: usize) {
        if let Some(mut stream) = self.table.get_mut(slot).and_then(|c| c.take_stream()) {
            if let Err(e) = stream.write_all(ERROR_404).await {
                debug!(slot, error = %e, "error response write failed");
            }
        }
        self.removals.enqueue(slot);
    }
}
