//! Bookkeeping for open client connections.
//!
//! The table is dense: slots `[0, len)` are exactly the active connections,
//! and removal swaps the last entry into the vacated slot. Slot indices are
//! therefore unstable across removals, which is why the event loop never
//! applies a removal mid-sweep; it queues them in a `RemovalQueue` and drains
//! once the sweep is over.

use crate::http::parser::RequestBuffer;
use std::future::poll_fn;
use std::io;
use std::task::Poll;
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// The table is full; the accepted socket must be dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct CapacityError;

/// One open client connection: its socket and the buffer accumulating its
/// request line.
///
/// The socket is `None` once it has been handed off to the awaiting-reply map
/// or closed; such a slot is dead weight until the next drain, and every read
/// path skips it. Taking the socket is also what makes removal handling
/// idempotent per connection — a second close attempt finds nothing to close.
pub struct Conn {
    stream: Option<TcpStream>,
    buf: RequestBuffer,
}

impl Conn {
    pub fn stream(&self) -> Option<&TcpStream> {
        self.stream.as_ref()
    }

    /// Moves the socket out of the slot, leaving the slot condemned until the
    /// removal queue drains.
    pub fn take_stream(&mut self) -> Option<TcpStream> {
        self.stream.take()
    }

    pub fn buf(&self) -> &RequestBuffer {
        &self.buf
    }

    pub fn buf_mut(&mut self) -> &mut RequestBuffer {
        &mut self.buf
    }
}

/// Dense table of open connections with a pool of reusable request buffers.
///
/// All buffers are allocated up front, one per slot of capacity; `add` checks
/// one out and `remove` returns it, so connection churn allocates nothing.
pub struct ConnTable {
    conns: Vec<Conn>,
    spare: Vec<RequestBuffer>,
    max: usize,
}

impl ConnTable {
    pub fn new(max_connections: usize, buffer_bytes: usize) -> Self {
        Self {
            conns: Vec::with_capacity(max_connections),
            spare: (0..max_connections)
                .map(|_| RequestBuffer::new(buffer_bytes))
                .collect(),
            max: max_connections,
        }
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Whether another connection can be admitted. The event loop only arms
    /// accept while this holds, so `add` failing is an anomaly worth logging.
    pub fn has_capacity(&self) -> bool {
        self.conns.len() < self.max
    }

    /// Appends a new active entry with a fresh buffer and returns its slot.
    pub fn add(&mut self, stream: TcpStream) -> Result<usize, CapacityError> {
        if self.conns.len() >= self.max {
            return Err(CapacityError);
        }
        let buf = self.spare.pop().ok_or(CapacityError)?;
        self.conns.push(Conn {
            stream: Some(stream),
            buf,
        });
        Ok(self.conns.len() - 1)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Conn> {
        self.conns.get_mut(slot)
    }

    /// Removes the entry at `slot`, swapping the last active entry into its
    /// place, and reclaims the vacated buffer. Returns false if `slot` is
    /// outside the active range; the table is left untouched in that case.
    pub fn remove(&mut self, slot: usize) -> bool {
        if slot >= self.conns.len() {
            return false;
        }
        let conn = self.conns.swap_remove(slot);
        let mut buf = conn.buf;
        buf.reset();
        self.spare.push(buf);
        // conn.stream dropped here closes the socket, if it was still held
        true
    }

    /// Resolves when some connection has input available (or has hit an I/O
    /// error), returning the lowest ready slot. Slots whose socket was
    /// already taken are skipped.
    pub async fn readable(&self) -> io::Result<usize> {
        poll_fn(|cx| {
            for (slot, conn) in self.conns.iter().enumerate() {
                let Some(stream) = conn.stream.as_ref() else {
                    continue;
                };
                match stream.poll_read_ready(cx) {
                    Poll::Ready(Ok(())) => return Poll::Ready(Ok(slot)),
                    Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                    Poll::Pending => {}
                }
            }
            Poll::Pending
        })
        .await
    }
}

/// Slot indices collected during one event-loop iteration, applied after the
/// iteration's sweep so in-flight slot indices stay valid.
#[derive(Default)]
pub struct RemovalQueue {
    slots: Vec<usize>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a slot for removal. Enqueueing the same slot twice within one
    /// batch would, after the first removal reshuffles the table, target
    /// whatever connection got swapped in — so duplicates are dropped here.
    pub fn enqueue(&mut self, slot: usize) {
        if !self.slots.contains(&slot) {
            self.slots.push(slot);
        }
    }

    /// Applies every queued removal and clears the queue. Indices are applied
    /// highest-first: removing a high slot only disturbs entries above the
    /// remaining queued indices, so none of them gets redirected to a
    /// swapped-in connection.
    pub fn drain(&mut self, table: &mut ConnTable) {
        self.slots.sort_unstable_by(|a, b| b.cmp(a));
        for slot in self.slots.drain(..) {
            if table.remove(slot) {
                debug!(slot, active = table.len(), "removed connection");
            } else {
                warn!(slot, "removal of inactive connection slot ignored");
            }
        }
    }
}
