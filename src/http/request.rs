/// Why a completed request line was rejected.
///
/// Every variant maps to the same client-visible outcome (a 404 and a closed
/// connection); the distinction exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// The line was not valid UTF-8.
    BadEncoding,
    /// The line contained no verb token at all.
    MissingVerb,
    /// The verb was present but was not `GET`.
    NotGet,
    /// No resource token followed the verb.
    MissingResource,
    /// The resource had no `?`, or nothing after it.
    MissingQuery,
}

/// A successfully parsed request line.
///
/// Borrows from the connection's buffer; only the query string matters
/// downstream, the rest is kept for logging.
#[derive(Debug, PartialEq, Eq)]
pub struct RequestLine<'a> {
    resource: &'a str,
    query: &'a str,
}

impl<'a> RequestLine<'a> {
    /// Parses a complete, terminator-stripped request line.
    ///
    /// Tokens are separated by single spaces. The verb must be exactly
    /// `GET` (case-sensitive), a resource must follow, and the resource
    /// must carry a non-empty query string after a `?`.
    pub fn parse(line: &'a [u8]) -> Result<Self, RequestError> {
        let line = std::str::from_utf8(line).map_err(|_| RequestError::BadEncoding)?;
        let mut tokens = line.split(' ');

        match tokens.next() {
            Some("GET") => {}
            Some("") | None => return Err(RequestError::MissingVerb),
            Some(_) => return Err(RequestError::NotGet),
        }

        let resource = match tokens.next() {
            Some(r) if !r.is_empty() => r,
            _ => return Err(RequestError::MissingResource),
        };

        match resource.split_once('?') {
            Some((_, query)) if !query.is_empty() => Ok(Self { resource, query }),
            _ => Err(RequestError::MissingQuery),
        }
    }

    pub fn resource(&self) -> &str {
        self.resource
    }

    /// The query string, without the leading `?`.
    pub fn query(&self) -> &str {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_well_formed_line() {
        let line = RequestLine::parse(b"GET /plan?stop=1").unwrap();
        assert_eq!(line.resource(), "/plan?stop=1");
        assert_eq!(line.query(), "stop=1");
    }

    #[test]
    fn reject_non_get_verb() {
        assert_eq!(
            RequestLine::parse(b"POST /plan?x=1"),
            Err(RequestError::NotGet)
        );
    }

    #[test]
    fn reject_missing_query() {
        assert_eq!(
            RequestLine::parse(b"GET /plan"),
            Err(RequestError::MissingQuery)
        );
        assert_eq!(
            RequestLine::parse(b"GET /plan?"),
            Err(RequestError::MissingQuery)
        );
    }
}
