/// Fixed size of the serialized request record, in bytes.
///
/// The routing engine owns the record layout; the gateway only guarantees
/// that exactly this many bytes travel to the broker unmodified. Changing
/// the length is a wire-protocol break for the broker process.
pub const RECORD_LEN: usize = 128;

/// Opaque fixed-size trip-planning request record.
///
/// Built from the query string of an accepted request and passed through to
/// the broker byte-for-byte. The gateway never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    bytes: [u8; RECORD_LEN],
}

impl RequestRecord {
    /// Builds a record from a raw query string. The query bytes are copied
    /// into the fixed layout, truncated at `RECORD_LEN` and zero-padded.
    pub fn from_query(query: &str) -> Self {
        let mut bytes = [0u8; RECORD_LEN];
        let src = query.as_bytes();
        let n = src.len().min(RECORD_LEN);
        bytes[..n].copy_from_slice(&src[..n]);
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
