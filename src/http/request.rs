/// Request commands the server can handle.
///
/// HTTP/0.9 knows neither headers nor HEAD, so a 0.9 GET is a distinct
/// command from a 1.x GET: the two produce different response shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// GET made with the bare HTTP/0.9 form (no version token, no headers)
    Get09,
    /// GET made with HTTP/1.0 or HTTP/1.1
    Get10,
    /// HEAD made with HTTP/1.0 or HTTP/1.1
    Head10,
    /// QUIT - shuts the server down
    Quit,
}

/// A parsed client request.
///
/// Immutable once parsing finishes, with one exception: `resource` is
/// rewritten to the not-found page when a lookup fails during composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The recognized command, if the request got far enough to classify
    pub command: Option<Command>,
    /// Resolved relative resource path; the configured index page when the
    /// client asked for "/"
    pub resource: String,
    /// Raw header strings in the order they appeared, values unvalidated
    pub headers: Vec<String>,
    /// False as soon as any malformed token is encountered; once false, the
    /// other fields are not trusted for dispatch
    pub is_valid: bool,
    /// True when the request line carried an explicit HTTP/1.x marker (three
    /// or more tokens); decides the shape of error replies
    pub uses_modern_http: bool,
    /// The original request text, kept for diagnostics
    pub raw: String,
}

impl Request {
    /// An empty, still-valid request for the parser to fill in.
    pub(crate) fn blank(raw: &str) -> Self {
        Self {
            command: None,
            resource: String::new(),
            headers: Vec::new(),
            is_valid: true,
            uses_modern_http: false,
            raw: raw.to_string(),
        }
    }
}
