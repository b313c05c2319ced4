//! Wire framing for the broker channel.
//!
//! Every message is a two-part frame: the correlation key, then an opaque
//! payload. Outbound the payload is the fixed-size request record; inbound it
//! is the reply text. The framing must stay byte-compatible with the external
//! broker process.
//!
//! ```text
//! [u32 length][u64 correlation key][payload...]
//!      |            `---------- length covers ----------'
//!      `- key + payload, big-endian
//! ```

use crate::broker::record::RequestRecord;
use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Length prefix plus correlation key.
const FRAME_HEADER: usize = 4;
const KEY_LEN: usize = 8;

/// Upper bound on a reply payload. Anything larger is a protocol violation,
/// not a legitimate trip plan.
const MAX_PAYLOAD: usize = 1024 * 1024;

/// One outbound request: a correlation key and the record it answers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerRequest {
    pub key: u64,
    pub record: RequestRecord,
}

/// One inbound reply: the correlation key of the request it answers and the
/// uninterpreted reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerReply {
    pub key: u64,
    pub text: String,
}

/// `tokio_util` codec for the broker framing: encodes `BrokerRequest`s,
/// decodes `BrokerReply`s.
#[derive(Debug, Default)]
pub struct BrokerCodec;

impl Encoder<BrokerRequest> for BrokerCodec {
    type Error = io::Error;

    fn encode(&mut self, item: BrokerRequest, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let record = item.record.as_bytes();
        dst.reserve(FRAME_HEADER + KEY_LEN + record.len());
        dst.put_u32((KEY_LEN + record.len()) as u32);
        dst.put_u64(item.key);
        dst.extend_from_slice(record);
        Ok(())
    }
}

impl Decoder for BrokerCodec {
    type Item = BrokerReply;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_HEADER {
            return Ok(None);
        }

        let len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if len < KEY_LEN || len > KEY_LEN + MAX_PAYLOAD {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("broker frame length {len} out of bounds"),
            ));
        }

        if src.len() < FRAME_HEADER + len {
            src.reserve(FRAME_HEADER + len - src.len());
            return Ok(None);
        }

        src.advance(FRAME_HEADER);
        let key = src.get_u64();
        let payload = src.split_to(len - KEY_LEN);
        let text = String::from_utf8(payload.to_vec()).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("reply not UTF-8: {e}"))
        })?;

        Ok(Some(BrokerReply { key, text }))
    }
}
