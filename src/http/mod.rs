//! The HTTP subset spoken by the gateway.
//!
//! Incoming traffic is a single request line, `GET <path>?<query>`, terminated
//! by a carriage return or line feed. No headers are read, no methods other
//! than GET are served, and connections never outlive one request.
//!
//! - **`parser`**: accumulates socket reads into a fixed-size buffer until a
//!   full request line exists
//! - **`request`**: validates the completed line and extracts the query string
//! - **`response`**: the two literal responses the gateway can produce

pub mod parser;
pub mod request;
pub mod response;
