//! Communication with the trip-planning broker.
//!
//! The gateway never computes an itinerary itself. Each accepted request
//! becomes an opaque fixed-size record, prefixed with a correlation key and
//! sent over a single duplex channel; replies come back tagged with the same
//! key and are relayed to whichever client originated them.

pub mod channel;
pub mod codec;
pub mod record;

pub use channel::BrokerChannel;
pub use codec::{BrokerCodec, BrokerReply, BrokerRequest};
pub use record::{RECORD_LEN, RequestRecord};
