use tripgate::http::request::{RequestError, RequestLine};

#[test]
fn test_parse_get_with_query() {
    let line = RequestLine::parse(b"GET /plan?stop=1").unwrap();
    assert_eq!(line.resource(), "/plan?stop=1");
    assert_eq!(line.query(), "stop=1");
}

#[test]
fn test_parse_query_with_multiple_parameters() {
    let line = RequestLine::parse(b"GET /plan?from=A&to=B&depart=0800").unwrap();
    assert_eq!(line.query(), "from=A&to=B&depart=0800");
}

#[test]
fn test_parse_ignores_trailing_http_version_token() {
    // Real clients send "GET /plan?x=1 HTTP/1.1"; only the first two tokens
    // matter.
    let line = RequestLine::parse(b"GET /plan?x=1 HTTP/1.1").unwrap();
    assert_eq!(line.query(), "x=1");
}

#[test]
fn test_reject_empty_line() {
    assert_eq!(RequestLine::parse(b"").unwrap_err(), RequestError::MissingVerb);
}

#[test]
fn test_reject_non_get_method() {
    assert_eq!(
        RequestLine::parse(b"POST /plan?x=1").unwrap_err(),
        RequestError::NotGet
    );
    // Case-sensitive: lowercase is not GET.
    assert_eq!(
        RequestLine::parse(b"get /plan?x=1").unwrap_err(),
        RequestError::NotGet
    );
}

#[test]
fn test_reject_missing_resource() {
    assert_eq!(
        RequestLine::parse(b"GET").unwrap_err(),
        RequestError::MissingResource
    );
    assert_eq!(
        RequestLine::parse(b"GET ").unwrap_err(),
        RequestError::MissingResource
    );
}

#[test]
fn test_reject_missing_or_empty_query() {
    assert_eq!(
        RequestLine::parse(b"GET /plan").unwrap_err(),
        RequestError::MissingQuery
    );
    assert_eq!(
        RequestLine::parse(b"GET /plan?").unwrap_err(),
        RequestError::MissingQuery
    );
}

#[test]
fn test_reject_invalid_utf8() {
    assert_eq!(
        RequestLine::parse(b"GET /plan?\xff\xfe").unwrap_err(),
        RequestError::BadEncoding
    );
}
