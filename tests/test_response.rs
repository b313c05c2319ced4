use tripgate::http::response::{ERROR_404, OK_TEXT_PLAIN};

// The response bytes are a wire contract: clients of the original deployment
// parse exactly these preambles.

#[test]
fn test_ok_preamble_exact_bytes() {
    assert_eq!(OK_TEXT_PLAIN, b"HTTP/1.0 200 OK\nContent-Type:text/plain\n\n");
}

#[test]
fn test_error_404_exact_bytes() {
    assert_eq!(
        ERROR_404,
        b"HTTP/1.0 404 Not Found\nContent-Type:text/plain\n\nFOUR ZERO FOUR\n"
    );
}

#[test]
fn test_ok_preamble_is_headers_only() {
    // The reply text is appended verbatim after the blank line, so the
    // preamble itself must end at the header/body separator.
    assert!(OK_TEXT_PLAIN.ends_with(b"\n\n"));
}
