//! Incremental request-line parsing over fixed-capacity buffers.
//!
//! A request must fit in a single `RequestBuffer`; there is no growth and no
//! multi-buffer assembly. Bytes arrive in arbitrary chunks and only the newly
//! appended region is scanned for a line terminator.

/// Outcome of appending freshly read bytes to a connection's buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Feed {
    /// A full request line is now in the buffer, terminator stripped.
    LineComplete,
    /// No terminator yet; keep the connection in the wait set.
    NeedMore,
    /// The buffer filled up without a terminator. The caller must close
    /// the connection.
    TooLong,
}

/// Fixed-capacity accumulation buffer for one in-flight request line.
///
/// Buffers are owned by connection table slots and recycled between
/// connections, so the capacity is fixed once at construction.
pub struct RequestBuffer {
    bytes: Vec<u8>,
    cap: usize,
}

impl RequestBuffer {
    pub fn new(cap: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(cap),
            cap,
        }
    }

    /// Bytes accumulated so far. After `Feed::LineComplete` this is exactly
    /// the request line, without its terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Room left before the request is declared too long. Reads must be
    /// bounded by this so `feed` never sees more bytes than fit.
    pub fn remaining(&self) -> usize {
        self.cap - self.bytes.len()
    }

    /// Empties the buffer for reuse by the next connection.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }
}

/// Append `new_bytes` (already read from the socket) and scan the appended
/// region for a carriage return or line feed. On `LineComplete` the buffer is
/// truncated at the terminator.
pub fn feed(buf: &mut RequestBuffer, new_bytes: &[u8]) -> Feed {
    let scan_from = buf.bytes.len();
    buf.bytes.extend_from_slice(new_bytes);

    if let Some(pos) = buf.bytes[scan_from..]
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
    {
        buf.bytes.truncate(scan_from + pos);
        return Feed::LineComplete;
    }

    if buf.bytes.len() >= buf.cap {
        Feed::TooLong
    } else {
        Feed::NeedMore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_in_single_read() {
        let mut buf = RequestBuffer::new(64);
        assert_eq!(feed(&mut buf, b"GET /plan?stop=1\n"), Feed::LineComplete);
        assert_eq!(buf.as_bytes(), b"GET /plan?stop=1");
    }

    #[test]
    fn line_split_across_reads() {
        let mut buf = RequestBuffer::new(64);
        assert_eq!(feed(&mut buf, b"GET /plan?"), Feed::NeedMore);
        assert_eq!(feed(&mut buf, b"foo=bar\r\n"), Feed::LineComplete);
        assert_eq!(buf.as_bytes(), b"GET /plan?foo=bar");
    }

    #[test]
    fn too_long_without_terminator() {
        let mut buf = RequestBuffer::new(8);
        assert_eq!(feed(&mut buf, b"GET /aaa"), Feed::TooLong);
    }
}
