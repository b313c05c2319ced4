//! The two literal HTTP responses the gateway ever produces.
//!
//! The gateway speaks just enough HTTP/1.0 to satisfy clients that issued a
//! one-line GET: a fixed preamble followed by the broker's reply text, or a
//! fixed 404 page. Nothing here is negotiated or templated.

/// Preamble written before the broker's reply text on success.
pub const OK_TEXT_PLAIN: &[u8] = b"HTTP/1.0 200 OK\nContent-Type:text/plain\n\n";

/// Complete response for any malformed or unparseable request.
pub const ERROR_404: &[u8] =
    b"HTTP/1.0 404 Not Found\nContent-Type:text/plain\n\nFOUR ZERO FOUR\n";
