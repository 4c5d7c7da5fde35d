//! Request-line tokenizer and validator.
//!
//! A request is one whitespace-tokenized line (plus optional header tokens)
//! terminated by `\r\n\r\n`. The token count decides which protocol variant
//! the client used:
//!
//! - 1-2 tokens: the bare HTTP/0.9 form (`GET /path` or `QUIT`)
//! - 3+ tokens: the HTTP/1.x form (`GET /path HTTP/1.1` plus header tokens)
//!
//! Parsing never fails with an error; a malformed request comes back with
//! `is_valid == false` and the connection layer decides which error page the
//! client gets.

use crate::http::request::{Command, Request};

/// Parses a raw request string into a [`Request`].
///
/// `index_file` is the resource substituted when the client asks for `/`.
pub fn parse_request(raw: &str, index_file: &str) -> Request {
    let mut req = Request::blank(raw);

    // The terminator is the only framing signal; its absence within the
    // read budget was already handled by the connection layer.
    if !raw.ends_with("\r\n\r\n") {
        req.is_valid = false;
        return req;
    }

    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let Some(&first) = tokens.first() else {
        req.is_valid = false;
        return req;
    };

    // QUIT short-circuits everything, trailing tokens included.
    if first == "QUIT" {
        req.command = Some(Command::Quit);
        return req;
    }

    if tokens.len() >= 3 {
        // The client attempted the versioned form, so error replies get the
        // 1.x shape even if the version token itself turns out bad.
        req.uses_modern_http = true;

        if !is_http_version(tokens[2]) {
            req.is_valid = false;
            return req;
        }

        match first {
            "GET" => req.command = Some(Command::Get10),
            "HEAD" => req.command = Some(Command::Head10),
            _ => {
                req.is_valid = false;
                return req;
            }
        }

        assign_resource(&mut req, tokens[1], index_file);
        if req.is_valid {
            req.headers = collect_headers(&tokens[3..]);
        }
    } else if tokens.len() == 2 && first == "GET" {
        req.command = Some(Command::Get09);
        assign_resource(&mut req, tokens[1], index_file);
    } else {
        req.is_valid = false;
    }

    req
}

fn is_http_version(token: &str) -> bool {
    matches!(token, "HTTP/1.0" | "HTTP/1.1")
}

/// Resolves the path token into `req.resource`, or marks the request
/// invalid when the path does not fit the grammar.
fn assign_resource(req: &mut Request, token: &str, index_file: &str) {
    if token == "/" {
        req.resource = index_file.to_string();
        return;
    }

    let path = token.strip_prefix('/').unwrap_or(token);
    if is_valid_resource_path(path) {
        req.resource = path.to_string();
    } else {
        req.is_valid = false;
    }
}

/// Checks a path (leading slash already stripped) against the resource
/// grammar: one or more segments, each made of one-or-more word characters
/// followed by any run of `.` or `-`, separated by single slashes. A
/// trailing slash is allowed; query strings, percent-encoding and `..` are
/// not expressible.
fn is_valid_resource_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    let mut i = 0;

    loop {
        let start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if i == start {
            // every segment must start with at least one word character
            return false;
        }

        while i < bytes.len() && (bytes[i] == b'.' || bytes[i] == b'-') {
            i += 1;
        }

        if i < bytes.len() && bytes[i] == b'/' {
            i += 1;
        }

        if i == bytes.len() {
            return true;
        }
    }
}

/// Reassembles header strings from the token stream after the version token.
///
/// A token made of word characters ending in a colon (`Host:`) opens a
/// header; every following token that is not itself such a marker is
/// concatenated onto it with no separator, until the next marker or the end
/// of input. Tokens arriving before any marker are dropped. A marker as the
/// very last token yields a header with an empty value.
///
/// Header *values* are not validated here, this is a best-effort
/// reconstruction of whatever the client sent.
fn collect_headers(tokens: &[&str]) -> Vec<String> {
    let mut headers = Vec::new();
    let mut current: Option<String> = None;

    for &token in tokens {
        if is_header_marker(token) {
            if let Some(done) = current.take() {
                headers.push(done);
            }
            current = Some(token.to_string());
        } else if let Some(open) = &mut current {
            open.push_str(token);
        }
    }

    if let Some(done) = current {
        headers.push(done);
    }

    headers
}

/// A header marker is a whole token of the form `word:` - one or more word
/// characters immediately followed by a terminal colon. `User-Agent:` is
/// *not* a marker (hyphen is not a word character) and gets concatenated
/// into whichever header is currently open.
fn is_header_marker(token: &str) -> bool {
    token
        .strip_suffix(':')
        .is_some_and(|name| {
            !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_request("GET /report.html HTTP/1.1\r\n\r\n", "index.html");

        assert!(req.is_valid);
        assert_eq!(req.command, Some(Command::Get10));
        assert_eq!(req.resource, "report.html");
        assert!(req.uses_modern_http);
    }

    #[test]
    fn path_grammar_accepts_dotted_and_hyphenated_segments() {
        assert!(is_valid_resource_path("index.html"));
        assert!(is_valid_resource_path("a-b.c/d"));
        assert!(is_valid_resource_path("dir/"));
        assert!(is_valid_resource_path("a..b"));
    }

    #[test]
    fn path_grammar_rejects_traversal_and_empty_segments() {
        assert!(!is_valid_resource_path(""));
        assert!(!is_valid_resource_path("../etc/passwd"));
        assert!(!is_valid_resource_path("a//b"));
        assert!(!is_valid_resource_path("a?q=1"));
    }

    #[test]
    fn header_marker_requires_bare_identifier() {
        assert!(is_header_marker("Host:"));
        assert!(is_header_marker("Accept:"));
        assert!(!is_header_marker("User-Agent:"));
        assert!(!is_header_marker(":"));
        assert!(!is_header_marker("Host"));
    }
}
